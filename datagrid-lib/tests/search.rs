use std::time::{Duration, Instant};

use datagrid_lib::{Column, Columns, DataTable, Intent, TableConfig};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn table(debounce: Duration) -> DataTable<String, String> {
    let columns = Columns::new(vec![Column::text("name", "Name", |s: &String| s.clone())]).unwrap();
    DataTable::new(columns, TableConfig::default().with_debounce(debounce)).unwrap()
}

/// Feed keystrokes at the given offsets, then tick every millisecond up to
/// `until` and collect the commits with their offsets.
fn simulate(
    table: &mut DataTable<String, String>,
    keystrokes: &[(u64, &str)],
    until: u64,
) -> Vec<(u64, String)> {
    let t0 = Instant::now();
    let mut commits = Vec::new();
    let mut pending = keystrokes.iter().peekable();

    for t in 0..=until {
        while let Some((at, text)) = pending.peek() {
            if *at != t {
                break;
            }
            table.input(*text, t0 + ms(t));
            pending.next();
        }
        if let Some(Intent::Search(term)) = table.tick(t0 + ms(t)) {
            commits.push((t, term));
        }
    }
    commits
}

// ============================================================================
// Debounce Timing Tests
// ============================================================================

#[test]
fn test_single_commit_after_last_keystroke() {
    let mut table = table(ms(800));
    let commits = simulate(
        &mut table,
        &[(0, "r"), (100, "ri"), (200, "rio"), (750, "rio de")],
        3000,
    );
    assert_eq!(commits, vec![(1550, "rio de".to_string())]);
}

#[test]
fn test_separate_bursts_commit_separately() {
    let mut table = table(ms(300));
    let commits = simulate(&mut table, &[(0, "a"), (50, "ab"), (1000, "abc")], 2000);
    assert_eq!(
        commits,
        vec![(350, "ab".to_string()), (1300, "abc".to_string())]
    );
}

#[test]
fn test_deadline_tracks_last_keystroke() {
    let mut table = table(ms(800));
    let t0 = Instant::now();
    assert_eq!(table.next_deadline(), None);

    table.input("s", t0);
    table.input("sp", t0 + ms(300));
    assert_eq!(table.next_deadline(), Some(t0 + ms(1100)));

    assert!(table.tick(t0 + ms(1100)).is_some());
    assert_eq!(table.next_deadline(), None);
}

// ============================================================================
// Change Gating Tests
// ============================================================================

#[test]
fn test_retyping_same_value_within_window_commits_once() {
    let mut table = table(ms(800));
    let commits = simulate(
        &mut table,
        &[
            (0, "a"),
            (50, "ab"),
            (100, "abc"),
            (200, "ab"),
            (250, "a"),
            (300, ""),
            (400, "a"),
            (450, "ab"),
            (500, "abc"),
        ],
        3000,
    );
    assert_eq!(commits, vec![(1300, "abc".to_string())]);
}

#[test]
fn test_settling_on_committed_value_does_not_recommit() {
    let mut table = table(ms(200));
    let commits = simulate(
        &mut table,
        &[(0, "abc"), (500, "abcd"), (600, "abc"), (1200, "abc ")],
        2000,
    );
    assert_eq!(commits, vec![(200, "abc".to_string())]);
    assert_eq!(table.committed_search(), "abc");
    assert_eq!(table.search_input(), "abc ");
}

#[test]
fn test_clearing_search_commits_empty_term() {
    let mut table = table(ms(100));
    let commits = simulate(&mut table, &[(0, "x"), (500, "")], 1000);
    assert_eq!(
        commits,
        vec![(100, "x".to_string()), (600, String::new())]
    );
}

// ============================================================================
// Reset Tests
// ============================================================================

#[test]
fn test_reset_cancels_pending_commit() {
    let mut table = table(ms(800));
    let t0 = Instant::now();

    table.input("porto", t0);
    table.reset();

    assert_eq!(table.next_deadline(), None);
    assert_eq!(table.tick(t0 + ms(5000)), None);
    assert_eq!(table.search_input(), "");
    assert_eq!(table.committed_search(), "");
}

#[test]
fn test_reset_forgets_committed_term() {
    let mut table = table(ms(100));
    let t0 = Instant::now();

    table.input("porto", t0);
    assert_eq!(table.tick(t0 + ms(100)), Some(Intent::Search("porto".into())));

    table.reset();
    table.input("porto", t0 + ms(200));
    assert_eq!(
        table.tick(t0 + ms(300)),
        Some(Intent::Search("porto".into())),
        "a remounted table starts from an empty committed term"
    );
}
