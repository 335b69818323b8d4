//! End-to-end selection scenarios against the reference tree.
//!
//! Most scenarios run with `DirectoryPolicy::EmptyOnly`, where the selected
//! names line up one-to-one with the fixture description; the rest check
//! what the default policy adds on top.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use dirpack_core::DirectoryPolicy;
use dirpack_core::DirectoryWalker;
use dirpack_core::EntrySink;
use dirpack_core::IgnoreMatch;
use dirpack_core::IgnoreSet;
use dirpack_core::LocalPrefix;
use dirpack_core::MemorySink;
use dirpack_core::SelectionConfig;
use dirpack_core::SelectionError;
use dirpack_core::Selector;
use dirpack_core::TarSink;
use dirpack_core::ZipSink;
use dirpack_core::test_utils::TreeFixture;
use std::io::Cursor;
use std::io::Read;
use tempfile::TempDir;

fn sample_tree() -> (TempDir, TreeFixture) {
    let dir = TempDir::new().unwrap();
    let fixture = TreeFixture::sample();
    fixture.write_to(dir.path()).unwrap();
    (dir, fixture)
}

fn empty_only() -> Selector<MemorySink> {
    Selector::new(MemorySink::new())
        .with_config(SelectionConfig::default().with_directories(DirectoryPolicy::EmptyOnly))
}

/// Asserts that `sink` holds exactly `expected` (fixture-relative names)
/// under `prefix`, each with the fixture's content.
fn assert_files_result(sink: &MemorySink, fixture: &TreeFixture, expected: &[&str], prefix: &str) {
    let prefix = LocalPrefix::new(prefix);
    assert_eq!(
        sink.len(),
        expected.len(),
        "unexpected entries: {:?}",
        sink.names().collect::<Vec<_>>()
    );

    for (relative, content) in fixture.entries() {
        let local_name = prefix.map(relative);
        if expected.contains(&relative.as_str()) {
            assert!(sink.contains(&local_name), "missing {local_name}");
            assert_eq!(sink.get(&local_name), content.as_deref(), "content of {local_name}");
        } else {
            assert!(!sink.contains(&local_name), "unexpected {local_name}");
        }
    }
}

const DEPTH_ONE: &[&str] = &[".hidden", "text file.txt", "Текстовый документ.txt", "empty dir/"];

const TEXT_AND_PICTURES: &[&str] = &[
    "text file.txt",
    "Текстовый документ.txt",
    "category/list.txt",
    "category/Pictures/128x160/Car/01.jpg",
    "category/Pictures/128x160/Car/02.jpg",
    "category/Pictures/240x320/Car/01.jpg",
    "category/Pictures/240x320/Car/02.jpg",
];

// ============================================================================
// Plain walks
// ============================================================================

#[test]
fn test_add_dir_with_local_path() {
    let (dir, fixture) = sample_tree();
    let mut selector = empty_only();
    selector.add_dir(dir.path(), "to/path").unwrap();
    assert_files_result(selector.sink(), &fixture, DEPTH_ONE, "to/path");
}

#[test]
fn test_add_dir_without_local_path() {
    let (dir, fixture) = sample_tree();
    let mut selector = empty_only();
    selector.add_dir(dir.path(), "").unwrap();
    assert_files_result(selector.sink(), &fixture, DEPTH_ONE, "");
}

#[test]
fn test_add_dir_recursive_with_local_path() {
    let (dir, fixture) = sample_tree();
    let mut selector = empty_only();
    let report = selector.add_dir_recursive(dir.path(), "to/path").unwrap();

    let all: Vec<&str> = fixture.paths().collect();
    assert_files_result(selector.sink(), &fixture, &all, "to/path");
    assert_eq!(report.files_added, 10);
    assert_eq!(report.directories_added, 3);
}

#[test]
fn test_add_dir_recursive_without_local_path() {
    let (dir, fixture) = sample_tree();
    let mut selector = empty_only();
    selector.add_dir_recursive(dir.path(), "/").unwrap();

    let all: Vec<&str> = fixture.paths().collect();
    assert_files_result(selector.sink(), &fixture, &all, "");
}

#[test]
fn test_add_dir_recursive_registers_every_directory_by_default() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    let report = selector.add_dir_recursive(dir.path(), "").unwrap();

    let directories: Vec<&str> = selector
        .sink()
        .names()
        .filter(|name| selector.sink().is_directory(name))
        .collect();
    assert_eq!(
        directories,
        vec![
            "catalog/",
            "catalog/Empty Dir/",
            "category/",
            "category/Pictures/",
            "category/Pictures/128x160/",
            "category/Pictures/128x160/Car/",
            "category/Pictures/240x320/",
            "category/Pictures/240x320/Car/",
            "empty dir/",
            "empty dir2/",
            "empty dir2/ещё пустой каталог/",
        ]
    );
    assert_eq!(report.files_added, 10);
    assert_eq!(report.entries_skipped, 0);
}

#[test]
fn test_empty_prefix_reproduces_walker_names() {
    let (dir, _fixture) = sample_tree();
    let walked: Vec<String> = DirectoryWalker::recursive(dir.path())
        .walk()
        .unwrap()
        .map(|entry| entry.unwrap().relative_path().to_string())
        .collect();

    let mut selector = Selector::new(MemorySink::new());
    let report = selector.add_dir_recursive(dir.path(), "").unwrap();
    assert_eq!(report.local_names, walked);
}

#[test]
fn test_max_depth_caps_recursive_walk() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new())
        .with_config(SelectionConfig::default().with_max_depth(Some(2)));
    selector.add_dir_recursive(dir.path(), "").unwrap();

    assert!(selector.sink().contains("category/Pictures/"));
    assert!(selector.sink().contains("catalog/New File"));
    assert!(!selector.sink().contains("category/Pictures/128x160/"));
}

// ============================================================================
// Entry sources
// ============================================================================

#[test]
fn test_add_files_from_iterator() {
    let (dir, fixture) = sample_tree();
    let walk = DirectoryWalker::flat(dir.path()).walk().unwrap();

    let mut selector = empty_only();
    selector.add_files_from_iter(walk, "to/project").unwrap();
    assert_files_result(selector.sink(), &fixture, DEPTH_ONE, "to/project");
}

#[test]
fn test_add_files_from_iterator_empty_local_path() {
    let (dir, fixture) = sample_tree();
    let walk = DirectoryWalker::flat(dir.path()).walk().unwrap();

    let mut selector = empty_only();
    selector.add_files_from_iter(walk, "").unwrap();
    assert_files_result(selector.sink(), &fixture, DEPTH_ONE, "");
}

#[test]
fn test_add_files_from_recursive_iterator() {
    let (dir, fixture) = sample_tree();
    let walk = DirectoryWalker::recursive(dir.path()).walk().unwrap();

    let mut selector = empty_only();
    selector.add_files_from_iter(walk, "to/project").unwrap();

    let all: Vec<&str> = fixture.paths().collect();
    assert_files_result(selector.sink(), &fixture, &all, "to/project");
}

#[test]
fn test_add_files_from_iterator_with_ignore_files() {
    let (dir, fixture) = sample_tree();
    let source = DirectoryWalker::flat(dir.path())
        .walk()
        .unwrap()
        .ignoring(IgnoreSet::new(["Текстовый документ.txt", "empty dir/"]));

    let mut selector = empty_only();
    selector.add_files_from_iter(source, "to/project").unwrap();
    assert_files_result(
        selector.sink(),
        &fixture,
        &[".hidden", "text file.txt"],
        "to/project",
    );
}

#[test]
fn test_add_files_from_recursive_iterator_with_ignore_files() {
    let (dir, fixture) = sample_tree();
    let ignore = IgnoreSet::new([
        ".hidden",
        "empty dir2/ещё пустой каталог/",
        "list.txt",
        "category/Pictures/240x320",
    ])
    .with_match(IgnoreMatch::PathSuffix);
    let source = DirectoryWalker::recursive(dir.path())
        .walk()
        .unwrap()
        .ignoring(ignore);

    let mut selector = empty_only();
    selector.add_files_from_iter(source, "to/project").unwrap();
    assert_files_result(
        selector.sink(),
        &fixture,
        &[
            "text file.txt",
            "Текстовый документ.txt",
            "empty dir/",
            "catalog/New File",
            "catalog/New File 2",
            "catalog/Empty Dir/",
            "category/Pictures/128x160/Car/01.jpg",
            "category/Pictures/128x160/Car/02.jpg",
        ],
        "to/project",
    );
}

#[test]
fn test_ignored_directory_prunes_whole_subtree() {
    let (dir, _fixture) = sample_tree();
    let source = DirectoryWalker::recursive(dir.path())
        .walk()
        .unwrap()
        .ignoring(IgnoreSet::new(["category/Pictures/240x320"]));

    let mut selector = Selector::new(MemorySink::new());
    selector.add_files_from_iter(source, "").unwrap();
    let sink = selector.sink();

    assert!(sink.names().all(|name| !name.starts_with("category/Pictures/240x320")));
    assert!(sink.contains("category/Pictures/128x160/Car/01.jpg"));
    assert!(sink.contains("category/Pictures/128x160/Car/02.jpg"));
    assert!(sink.is_directory("catalog/Empty Dir/"));
}

#[test]
fn test_exact_ignore_does_not_match_suffix() {
    let (dir, _fixture) = sample_tree();
    let source = DirectoryWalker::recursive(dir.path())
        .walk()
        .unwrap()
        .ignoring(IgnoreSet::new(["list.txt"]));

    let mut selector = Selector::new(MemorySink::new());
    selector.add_files_from_iter(source, "").unwrap();
    assert!(selector.sink().contains("category/list.txt"));
}

/// Makes `path` unreadable, returning `false` when permissions are not
/// enforced for the current user (e.g. running as root).
#[cfg(unix)]
fn make_unreadable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)).unwrap();
    let enforced = if path.is_dir() {
        std::fs::read_dir(path).is_err()
    } else {
        std::fs::read(path).is_err()
    };
    if !enforced {
        restore_permissions(path);
    }
    enforced
}

#[cfg(unix)]
fn restore_permissions(path: &std::path::Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_ignored_unreadable_directory_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let secret = dir.path().join("secret");
    std::fs::create_dir(&secret).unwrap();
    std::fs::write(secret.join("inner.txt"), "inner").unwrap();
    std::fs::write(dir.path().join("keep.txt"), "keep").unwrap();
    if !make_unreadable(&secret) {
        return;
    }

    let walk = DirectoryWalker::recursive(dir.path()).walk().unwrap();
    let pruned_walk = Selector::new(MemorySink::new())
        .add_files_from_iter(walk.ignoring(IgnoreSet::new(["secret/"])), "");

    let walk = DirectoryWalker::recursive(dir.path()).walk().unwrap();
    let generic_filter = Selector::new(MemorySink::new()).add_files_from_iter(
        dirpack_core::IgnoreFilter::new(walk, IgnoreSet::new(["secret/"])),
        "",
    );

    let walk = DirectoryWalker::recursive(dir.path()).walk().unwrap();
    let unfiltered = Selector::new(MemorySink::new()).add_files_from_iter(walk, "");
    restore_permissions(&secret);

    assert_eq!(pruned_walk.unwrap().local_names, vec!["keep.txt"]);
    assert_eq!(generic_filter.unwrap().local_names, vec!["keep.txt"]);
    assert!(unfiltered.unwrap_err().is_io());
}

#[test]
fn test_insert_under_prefix() {
    let (dir, fixture) = sample_tree();
    let walk = DirectoryWalker::recursive(dir.path()).walk().unwrap();

    let mut selector = empty_only();
    selector.insert("path/to", walk).unwrap();

    let all: Vec<&str> = fixture.paths().collect();
    assert_files_result(selector.sink(), &fixture, &all, "path/to");
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_add_files_from_glob() {
    let (dir, fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_glob(dir.path(), "**.{txt,jpg}", "/")
        .unwrap();
    assert_files_result(
        selector.sink(),
        &fixture,
        &["text file.txt", "Текстовый документ.txt"],
        "/",
    );
}

#[test]
fn test_add_files_from_glob_recursive() {
    let (dir, fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_glob_recursive(dir.path(), "**.{txt,jpg}", "/")
        .unwrap();
    assert_files_result(selector.sink(), &fixture, TEXT_AND_PICTURES, "/");
}

#[test]
fn test_glob_single_star_stays_in_first_segment() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_glob_recursive(dir.path(), "*.txt", "")
        .unwrap();

    let names: Vec<&str> = selector.sink().names().collect();
    assert_eq!(names, vec!["text file.txt", "Текстовый документ.txt"]);
}

#[test]
fn test_glob_selects_directories() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector.add_files_from_glob(dir.path(), "empty*", "").unwrap();

    let names: Vec<&str> = selector.sink().names().collect();
    assert_eq!(names, vec!["empty dir/", "empty dir2/"]);
}

#[test]
fn test_add_files_from_regex() {
    let (dir, fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_regex(dir.path(), r"~\.(txt|jpe?g)$~i", "path")
        .unwrap();
    assert_files_result(
        selector.sink(),
        &fixture,
        &["text file.txt", "Текстовый документ.txt"],
        "path",
    );
}

#[test]
fn test_add_files_from_regex_recursive() {
    let (dir, fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_regex_recursive(dir.path(), r"~\.(txt|jpe?g)$~i", "/")
        .unwrap();
    assert_files_result(selector.sink(), &fixture, TEXT_AND_PICTURES, "/");
}

#[test]
fn test_regex_plain_syntax_searches_whole_path() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    selector
        .add_files_from_regex_recursive(dir.path(), "240x320/Car/0[12]", "")
        .unwrap();

    let names: Vec<&str> = selector.sink().names().collect();
    assert_eq!(
        names,
        vec![
            "category/Pictures/240x320/Car/01.jpg",
            "category/Pictures/240x320/Car/02.jpg",
        ]
    );
}

#[test]
fn test_pattern_error_before_traversal() {
    let mut selector = Selector::new(MemorySink::new());

    let err = selector
        .add_files_from_regex_recursive("/no/such/root", "(unclosed", "")
        .unwrap_err();
    assert!(err.is_pattern_error());

    let err = selector
        .add_files_from_glob("/no/such/root", "[abc", "")
        .unwrap_err();
    assert!(err.is_pattern_error());
    assert!(selector.sink().is_empty());
}

// ============================================================================
// Errors and sinks
// ============================================================================

#[test]
fn test_missing_root_is_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing");
    let mut selector = Selector::new(MemorySink::new());

    let err = selector.add_dir(&missing, "").unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.path(), Some(missing.as_path()));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_remaining_walk() {
    let dir = TempDir::new().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        std::fs::write(dir.path().join(name), name).unwrap();
    }
    let locked = dir.path().join("b.txt");
    if !make_unreadable(&locked) {
        return;
    }

    let mut selector = Selector::new(MemorySink::new());
    let result = selector.add_dir(dir.path(), "");
    restore_permissions(&locked);

    let err = result.unwrap_err();
    assert!(err.is_io());
    assert_eq!(err.path(), Some(locked.as_path()));
    assert_eq!(selector.sink().names().collect::<Vec<_>>(), vec!["a.txt"]);
}

#[test]
fn test_root_file_is_rejected() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    let err = selector
        .add_dir_recursive(dir.path().join(".hidden"), "")
        .unwrap_err();
    assert!(matches!(err, SelectionError::NotADirectory { .. }));
}

#[test]
fn test_repeated_calls_overwrite_in_memory() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(MemorySink::new());
    let first = selector.add_dir(dir.path(), "").unwrap();
    let second = selector.add_dir(dir.path(), "").unwrap();

    assert_eq!(first.local_names, second.local_names);
    assert_eq!(selector.sink().len(), first.total_entries());
}

#[test]
fn test_zip_sink_end_to_end() {
    let (dir, fixture) = sample_tree();
    let sink = ZipSink::new(Cursor::new(Vec::new()));
    let mut selector = Selector::new(sink)
        .with_config(SelectionConfig::default().with_directories(DirectoryPolicy::EmptyOnly));
    selector.add_dir_recursive(dir.path(), "to/path").unwrap();

    let bytes = selector.into_sink().finish().unwrap().into_inner();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), fixture.entries().len());

    for (relative, content) in fixture.entries() {
        let mut entry = archive.by_name(&format!("to/path/{relative}")).unwrap();
        match content {
            None => assert!(entry.is_dir()),
            Some(expected) => {
                let mut actual = Vec::new();
                entry.read_to_end(&mut actual).unwrap();
                assert_eq!(&actual, expected);
            }
        }
    }
}

#[test]
fn test_zip_sink_rejects_repeated_selection() {
    let (dir, _fixture) = sample_tree();
    let mut selector = Selector::new(ZipSink::new(Cursor::new(Vec::new())));
    selector.add_dir(dir.path(), "").unwrap();

    let err = selector.add_dir(dir.path(), "").unwrap_err();
    assert!(matches!(err, SelectionError::Sink { .. }));
}

#[test]
fn test_tar_gzip_sink_end_to_end() {
    let (dir, _fixture) = sample_tree();
    let sink = TarSink::gzip(Vec::new(), 6).unwrap();
    let mut selector = Selector::new(sink);
    let report = selector
        .add_files_from_glob_recursive(dir.path(), "category/**", "")
        .unwrap();

    let compressed = selector.into_sink().finish_gzip().unwrap();
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(compressed.as_slice()));
    let names: Vec<String> = archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names.len(), report.total_entries());
    assert!(names.iter().any(|name| name == "category/list.txt"));
    assert!(names.iter().all(|name| name.starts_with("category/")));
}

#[test]
fn test_selector_through_borrowed_sink() {
    let (dir, _fixture) = sample_tree();
    let mut sink = MemorySink::new();
    {
        let mut selector = Selector::new(&mut sink);
        selector.add_dir(dir.path(), "a").unwrap();
        selector.add_dir(dir.path(), "b").unwrap();
    }
    assert!(sink.contains("a/.hidden"));
    assert!(sink.contains("b/.hidden"));
    sink.add_file("extra", Vec::new()).unwrap();
    assert!(sink.contains("extra"));
}
