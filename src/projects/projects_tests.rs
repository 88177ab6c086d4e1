use super::*;
use crate::config::SearchConfig;
use crate::error::LauncherError;
use chrono::{TimeZone, Utc};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn project(name: &str, path: &str) -> Arc<Project> {
    Arc::new(Project::new(name, path))
}

fn names(results: &[Arc<Project>]) -> Vec<&str> {
    results.iter().map(|p| p.name.as_str()).collect()
}

fn indexed(projects: &[Arc<Project>]) -> ProjectSearch {
    let mut search = ProjectSearch::new(&SearchConfig::default());
    search.on_projects_changed(projects.to_vec(), Instant::now());
    search
}

// ============================================
// RANKING
// ============================================

#[test]
fn test_empty_query_returns_input_unchanged() {
    let projects = vec![project("b", "/b"), project("a", "/a"), project("c", "/c")];
    let search = ProjectSearch::new(&SearchConfig::default());

    assert_eq!(names(&search.rank("", &projects)), vec!["b", "a", "c"]);
    assert_eq!(names(&search.rank("   ", &projects)), vec!["b", "a", "c"]);
}

#[test]
fn test_empty_query_returns_same_handles() {
    let projects = vec![project("a", "/a")];
    let search = indexed(&projects);
    let results = search.rank("", &projects);
    assert!(Arc::ptr_eq(&results[0], &projects[0]));
}

#[test]
fn test_query_without_index_is_empty() {
    let projects = vec![project("Foo", "/foo")];
    let search = ProjectSearch::new(&SearchConfig::default());
    assert!(search.rank("foo", &projects).is_empty());
}

#[test]
fn test_prefix_match_moves_ahead_of_substring_match() {
    let projects = vec![project("Foo Bar", "/a"), project("Barometer", "/b")];
    let search = indexed(&projects);

    assert_eq!(
        names(&search.rank("Bar", &projects)),
        vec!["Barometer", "Foo Bar"]
    );
}

#[test]
fn test_prefix_matches_precede_fuzzy_only_matches() {
    let projects = vec![
        project("my-app", "/code/my-app"),
        project("zzz", "/work/app-support"),
        project("Apple", "/code/fruit"),
    ];
    let search = indexed(&projects);

    let results = search.rank("app", &projects);
    assert_eq!(names(&results), vec!["Apple", "my-app", "zzz"]);
}

#[test]
fn test_name_match_outranks_path_match() {
    let projects = vec![
        project("tools", "/home/me/launcher/tools"),
        project("my-launcher", "/home/me/x"),
    ];
    let search = indexed(&projects);
    assert_eq!(
        names(&search.rank("launcher", &projects)),
        vec!["my-launcher", "tools"]
    );
}

#[test]
fn test_alias_is_searched_and_boosted() {
    let projects = vec![
        project("ZZ Website", "/w"),
        Arc::new(Project::new("Company Portal", "/p").with_alias("web")),
    ];
    let search = indexed(&projects);

    let results = search.rank("web", &projects);
    assert_eq!(names(&results), vec!["Company Portal", "ZZ Website"]);
}

#[test]
fn test_no_match_is_empty() {
    let projects = vec![project("Foo Bar", "/a")];
    let search = indexed(&projects);
    assert!(search.rank("qqq", &projects).is_empty());
}

#[test]
fn test_query_is_case_insensitive() {
    let projects = vec![project("LauncherCore", "/x")];
    let search = indexed(&projects);
    assert_eq!(names(&search.rank("CORE", &projects)), vec!["LauncherCore"]);
}

#[test]
fn test_single_character_query_uses_prefix_only() {
    let projects = vec![
        project("Foo Bar", "/a"),
        project("Barometer", "/b"),
        Arc::new(Project::new("Quux", "/q").with_alias("bq")),
        project("abc", "/c/b"),
    ];
    let search = indexed(&projects);

    assert_eq!(
        names(&search.rank("b", &projects)),
        vec!["Barometer", "Quux"]
    );
}

#[test]
fn test_results_are_deduplicated_by_path() {
    let projects = vec![
        project("Barometer", "/same"),
        project("Bar copy", "/same"),
        project("Foo Bar", "/other"),
    ];
    let search = indexed(&projects);

    let results = search.rank("bar", &projects);
    let paths: Vec<&str> = results.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["/same", "/other"]);
    assert_eq!(results[0].name, "Barometer");
}

#[test]
fn test_threshold_controls_gapped_fuzzy_matches() {
    let projects = vec![project("foo bar", "/x")];

    let strict = SearchOptions {
        threshold: 0.0,
        ..SearchOptions::default()
    };
    let lenient = SearchOptions {
        threshold: 1.0,
        ..SearchOptions::default()
    };
    let index = ProjectIndex::build(1, &projects);

    assert!(rank_index(&index, "fbr", &strict).is_empty());
    assert_eq!(names(&rank_index(&index, "fbr", &lenient)), vec!["foo bar"]);
}

#[test]
fn test_fuzzy_candidates_keep_collection_order_on_ties() {
    let projects = vec![
        project("alpha-core", "/1"),
        project("beta-core", "/2"),
        project("gamma-core", "/3"),
    ];
    let index = ProjectIndex::build(1, &projects);
    let candidates = fuzzy_candidates(&index, "core", &SearchOptions::default());

    let positions: Vec<usize> = candidates.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert!(candidates.iter().all(|c| c.score == 1.0));
}

#[test]
fn test_zero_weight_field_is_ignored() {
    let projects = vec![project("tools", "/src/launcher")];
    let options = SearchOptions {
        path_weight: 0.0,
        ..SearchOptions::default()
    };
    let index = ProjectIndex::build(1, &projects);
    assert!(rank_index(&index, "launcher", &options).is_empty());
}

// ============================================
// INDEX BUILDER
// ============================================

#[test]
fn test_first_build_is_immediate() {
    let mut builder = IndexBuilder::new(Duration::from_millis(300));
    assert!(builder.current().is_none());

    assert!(builder.on_projects_changed(vec![project("a", "/a")], Instant::now()));
    assert_eq!(builder.rebuild_count(), 1);
    assert_eq!(builder.current().map(|i| i.len()), Some(1));
    assert!(!builder.is_rebuild_pending());
}

#[test]
fn test_burst_of_changes_coalesces_into_one_rebuild() {
    let start = Instant::now();
    let window = Duration::from_millis(300);
    let mut builder = IndexBuilder::new(window);
    builder.on_projects_changed(vec![project("v0", "/0")], start);

    let mut last = start;
    for i in 1..=5u64 {
        last = start + Duration::from_millis(i * 50);
        let snapshot = (0..=i)
            .map(|n| project(&format!("v{}", n), &format!("/{}", n)))
            .collect();
        assert!(!builder.on_projects_changed(snapshot, last));
        assert!(!builder.poll(last));
    }

    assert!(builder.is_rebuild_pending());
    assert_eq!(builder.next_deadline(), Some(last + window));
    assert!(!builder.poll(last + Duration::from_millis(299)));
    assert_eq!(builder.rebuild_count(), 1);

    assert!(builder.poll(last + window));
    assert_eq!(builder.rebuild_count(), 2);
    assert_eq!(builder.current().map(|i| i.len()), Some(6));
    assert!(!builder.poll(last + window * 2));
}

#[test]
fn test_queries_use_previous_index_while_rebuild_pending() {
    let start = Instant::now();
    let mut search = ProjectSearch::new(&SearchConfig::default());
    let old = vec![project("Alpha", "/a")];
    search.on_projects_changed(old.clone(), start);

    let new = vec![project("Alpha", "/a"), project("Alphabet", "/b")];
    search.on_projects_changed(new.clone(), start);

    assert_eq!(names(&search.rank("alpha", &new)), vec!["Alpha"]);

    assert!(search.poll(start + Duration::from_millis(300)));
    assert_eq!(names(&search.rank("alpha", &new)), vec!["Alpha", "Alphabet"]);
}

#[test]
fn test_index_generation_increases() {
    let now = Instant::now();
    let mut builder = IndexBuilder::new(Duration::from_millis(10));
    builder.on_projects_changed(vec![], now);
    let first = builder.current().map(|i| i.generation());

    builder.on_projects_changed(vec![project("a", "/a")], now);
    assert!(builder.flush());
    let second = builder.current().map(|i| i.generation());

    assert!(second > first);
    assert!(!builder.flush());
}

#[test]
fn test_old_index_handle_survives_swap() {
    let now = Instant::now();
    let mut builder = IndexBuilder::new(Duration::ZERO);
    builder.on_projects_changed(vec![project("a", "/a")], now);
    let held = builder.current().unwrap();

    builder.on_projects_changed(vec![], now);
    builder.poll(now);

    assert_eq!(held.len(), 1);
    assert_eq!(builder.current().map(|i| i.len()), Some(0));
}

#[test]
fn test_configure_updates_options() {
    let mut search = ProjectSearch::new(&SearchConfig::default());
    let config = SearchConfig {
        min_match_char_length: 4,
        ..SearchConfig::default()
    };
    search.configure(&config);
    assert_eq!(search.options().min_match_char_length, 4);
}

// ============================================
// SORTING
// ============================================

fn stats(name: &str, hits: u32, top: bool, opened_day: Option<u32>) -> Arc<Project> {
    let mut p = Project::new(name, format!("/{}", name));
    p.hits = hits;
    p.top = top;
    p.last_opened = opened_day.map(|d| Utc.with_ymd_and_hms(2026, 1, d, 12, 0, 0).unwrap());
    Arc::new(p)
}

#[test]
fn test_sort_by_hits_with_pinned_first() {
    let mut projects = vec![
        stats("low", 1, false, None),
        stats("high", 9, false, None),
        stats("pinned", 0, true, None),
        stats("mid", 5, false, None),
    ];
    sort_projects(&mut projects, ProjectSortBy::Hits);
    assert_eq!(names(&projects), vec!["pinned", "high", "mid", "low"]);
}

#[test]
fn test_sort_by_last_opened_puts_never_opened_last() {
    let mut projects = vec![
        stats("never", 100, false, None),
        stats("old", 0, false, Some(1)),
        stats("recent", 0, false, Some(20)),
    ];
    sort_projects(&mut projects, ProjectSortBy::LastOpened);
    assert_eq!(names(&projects), vec!["recent", "old", "never"]);
}

#[test]
fn test_sort_by_name_is_case_insensitive_and_stable() {
    let mut projects = vec![
        stats("beta", 0, false, None),
        stats("Alpha", 0, false, None),
        stats("alpha", 3, false, None),
    ];
    sort_projects(&mut projects, ProjectSortBy::Name);
    assert_eq!(names(&projects), vec!["Alpha", "alpha", "beta"]);
}

// ============================================
// LOADING
// ============================================

#[test]
fn test_project_deserializes_cache_record() {
    let json = r#"{
        "name": "launcher",
        "path": "/code/launcher",
        "project_type": "rust",
        "version_control": "Git",
        "hits": 4,
        "launcher_id": null,
        "top": true,
        "is_custom": false,
        "last_opened": "2026-03-01T08:30:00Z",
        "alias": "lc"
    }"#;
    let p: Project = serde_json::from_str(json).unwrap();
    assert_eq!(p.version_control, VersionControl::Git);
    assert_eq!(p.alias.as_deref(), Some("lc"));
    assert_eq!(
        p.last_opened,
        Some(Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0).unwrap())
    );
}

#[test]
fn test_project_minimal_record_defaults() {
    let p: Project = serde_json::from_str(r#"{"name": "x", "path": "/x"}"#).unwrap();
    assert_eq!(p, Project::new("x", "/x"));
}

#[test]
fn test_load_projects_from_array_and_cache() {
    let dir = tempfile::tempdir().unwrap();

    let list = dir.path().join("list.json");
    std::fs::write(&list, r#"[{"name": "a", "path": "/a"}]"#).unwrap();
    assert_eq!(load_projects(&list).unwrap().len(), 1);

    let cache = dir.path().join("cache.json");
    let mut file = std::fs::File::create(&cache).unwrap();
    write!(
        file,
        r#"{{"projects": [{{"name": "a", "path": "/a"}}, {{"name": "b", "path": "/b"}}], "last_scan": "2026-01-01T00:00:00Z", "version": "1"}}"#
    )
    .unwrap();
    assert_eq!(load_projects(&cache).unwrap().len(), 2);
}

#[test]
fn test_load_projects_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        load_projects(&missing),
        Err(LauncherError::Io { .. })
    ));

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{\"projects\": 3}").unwrap();
    assert!(matches!(load_projects(&bad), Err(LauncherError::Json(_))));
}
