use descript_ion::{
    DescriptError, DescriptionStore, Dialect, LineTerminator, MemoryFileSystem, StoreOptions,
    TextEncoding,
};
use encoding_rs::WINDOWS_1252;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path(parts: &[&str]) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("fixtures");
    for part in parts {
        p.push(part);
    }
    p
}

/// Copies a fixture directory's descript.ion into a fresh temporary directory.
fn copy_fixture(name: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::copy(
        fixture_path(&[name, "descript.ion"]),
        dir.path().join("descript.ion"),
    )
    .unwrap_or_else(|e| panic!("failed to copy fixture {}: {}", name, e));
    dir
}

fn load(dir: &Path) -> DescriptionStore {
    let mut store = DescriptionStore::open(dir).expect("open store");
    assert!(store.load().expect("load"), "expected a file in {}", dir.display());
    store
}

fn lf_options() -> StoreOptions {
    StoreOptions::default().with_line_terminator(LineTerminator::Lf)
}

#[test]
fn total_commander_ansi_fixture() {
    let store = load(&fixture_path(&["tc_ansi"]));

    assert_eq!(store.dialect(), Dialect::TotalCommander);
    assert_eq!(store.encoding(), Some(TextEncoding::Legacy(WINDOWS_1252)));
    assert_eq!(store.len(), 6);

    assert_eq!(store.get_comment("report.pdf"), Some("Annual report 2025"));
    assert_eq!(store.get_comment("REPORT.PDF"), Some("Annual report 2025"));
    assert_eq!(store.get_comment("my file.txt"), Some("Spaces in the name"));
    assert_eq!(store.get_comment("a\"b"), Some("Quote in the name"));
    assert_eq!(store.get_comment("notes.txt"), Some("First line\nSecond line"));
    assert_eq!(store.get_comment("müller.doc"), Some("Grüße"));
    assert_eq!(store.get_comment("README"), Some(""), "bare name is an entry with empty comment");
    assert_eq!(store.get_comment("never-there.txt"), None);
}

#[test]
fn double_commander_utf8_fixture() {
    let store = load(&fixture_path(&["dc_utf8"]));

    assert_eq!(store.dialect(), Dialect::DoubleCommander);
    assert_eq!(store.encoding(), Some(TextEncoding::Utf8Bom));
    assert_eq!(store.get_comment("photos"), Some("My folder\nwith two lines"));
    assert_eq!(store.get_comment("plain.txt"), Some("Single line"));
}

#[test]
fn utf16_fixtures_detect_byte_order() {
    for (name, expected) in [
        ("utf16le", TextEncoding::Utf16Le),
        ("utf16be", TextEncoding::Utf16Be),
    ] {
        let store = load(&fixture_path(&[name]));
        assert_eq!(store.encoding(), Some(expected), "encoding for {}", name);
        assert_eq!(store.get_comment("日本.txt"), Some("Japanese name"), "in {}", name);
        assert_eq!(store.get_comment("B.TXT"), Some("Café"), "in {}", name);
    }
}

#[test]
fn mixed_file_resolves_to_last_evidence() {
    let store = load(&fixture_path(&["mixed"]));

    assert_eq!(store.dialect(), Dialect::DoubleCommander);
    assert_eq!(store.get_comment("one.txt"), Some("a\nb"));
    assert_eq!(store.get_comment("two.txt"), Some("c\nd"));
    assert_eq!(store.get_comment("three.txt"), Some("plain"));
}

#[test]
fn auto_detect_keeps_total_commander_for_marked_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("descript.ion"), b"x.txt a\\nb\x04\xC2\r\n").expect("write");

    let store = load(dir.path());
    assert_eq!(store.dialect(), Dialect::TotalCommander);
    assert_eq!(store.get_comment("x.txt"), Some("a\nb"));
}

#[test]
fn missing_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("new").join("folder");
    let mut store = DescriptionStore::with_options(&target, lf_options()).expect("open");

    assert!(!store.is_loaded());
    assert!(!store.load().expect("load"));
    assert!(store.is_loaded());
    assert!(store.is_empty());
    assert_eq!(store.dialect(), Dialect::TotalCommander);
    assert_eq!(store.encoding(), None);

    store.set_comment("a.txt", "hello").expect("set");
    store.save().expect("save creates the directory");

    let bytes = fs::read(target.join("descript.ion")).expect("read back");
    assert_eq!(bytes, b"\xEF\xBB\xBFa.txt hello\n");
}

#[test]
fn total_commander_multiline_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = lf_options().with_dialect(Dialect::TotalCommander);
    let mut store = DescriptionStore::with_options(dir.path(), options).expect("open");
    store.set_comment("notes.txt", "First line\nSecond line").expect("set");

    // U+00C2 is C3 82 in UTF-8.
    assert_eq!(
        store.render(),
        b"\xEF\xBB\xBFnotes.txt First line\\nSecond line\x04\xC3\x82\n"
    );
}

#[test]
fn double_commander_multiline_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options = lf_options().with_dialect(Dialect::DoubleCommander);
    let mut store = DescriptionStore::with_options(dir.path(), options).expect("open");
    store.set_comment("folder", "My folder\nwith two lines").expect("set");
    store.save().expect("save");

    let bytes = fs::read(dir.path().join("descript.ion")).expect("read back");
    assert_eq!(bytes, b"\xEF\xBB\xBFfolder My folder\xC2\xA0with two lines\n");

    let reloaded = load(dir.path());
    assert_eq!(reloaded.dialect(), Dialect::DoubleCommander);
    assert_eq!(reloaded.get_comment("folder"), Some("My folder\nwith two lines"));
}

#[test]
fn round_trip_preserves_mapping_and_encoding() {
    for fixture in ["tc_ansi", "dc_utf8", "utf16le", "utf16be", "mixed"] {
        let dir = copy_fixture(fixture);
        let original = load(dir.path());
        original.save().expect("save");
        let first = fs::read(dir.path().join("descript.ion")).expect("read");
        original.save().expect("second save");
        let second = fs::read(dir.path().join("descript.ion")).expect("read");
        assert_eq!(first, second, "save is not idempotent for {}", fixture);

        let reloaded = load(dir.path());
        assert_eq!(reloaded.encoding(), original.encoding(), "encoding changed for {}", fixture);
        assert_eq!(reloaded.dialect(), original.dialect(), "dialect changed for {}", fixture);
        assert_eq!(reloaded.len(), original.len(), "entry count changed for {}", fixture);
        for entry in original.entries() {
            assert_eq!(
                reloaded.get_comment(&entry.name),
                Some(entry.comment.as_str()),
                "comment for {} changed in {}",
                entry.name,
                fixture
            );
        }
    }
}

#[test]
fn quoted_names_round_trip_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = DescriptionStore::with_options(dir.path(), lf_options()).expect("open");
    store.set_comment("my file.txt", "spaced").expect("set");
    store.set_comment("a\"b", "quoted").expect("set");
    store.set_comment("\"both here\"", "wrapped").expect("set");
    store.save().expect("save");

    let text = fs::read_to_string(dir.path().join("descript.ion")).expect("read");
    assert!(text.contains("\"my file.txt\" spaced\n"), "got {:?}", text);
    assert!(text.contains("\"a\"\"b\" quoted\n"), "got {:?}", text);
    assert!(text.contains("\"\"\"both here\"\"\" wrapped\n"), "got {:?}", text);

    let reloaded = load(dir.path());
    assert_eq!(reloaded.get_comment("my file.txt"), Some("spaced"));
    assert_eq!(reloaded.get_comment("a\"b"), Some("quoted"));
    assert_eq!(reloaded.get_comment("\"both here\""), Some("wrapped"));
}

#[test]
fn duplicate_names_last_write_wins() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("descript.ion"),
        "a.txt one\nb.txt keep\nA.TXT two\n",
    )
    .expect("write");

    let store = load(dir.path());
    assert_eq!(store.len(), 2);
    assert_eq!(store.get_comment("a.txt"), Some("two"));
    let names: Vec<&str> = store.entries().names().collect();
    assert_eq!(names, ["A.TXT", "b.txt"]);
}

#[test]
fn stray_records_are_dropped() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("descript.ion"), "\"\" nothing\n \n ok.txt leading space\nfine.txt yes\n")
        .expect("write");

    let store = load(dir.path());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get_comment("fine.txt"), Some("yes"));
}

#[test]
fn orphaned_entries_are_pruned() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("present.txt"), b"x").expect("write");
    fs::create_dir(dir.path().join("sub")).expect("mkdir");

    let mut store = DescriptionStore::open(dir.path()).expect("open");
    store.load().expect("load");
    store.set_comment("present.txt", "kept").expect("set");
    store.set_comment("sub", "kept too").expect("set");
    store.set_comment("gone.txt", "orphan").expect("set");

    assert_eq!(store.remove_orphaned_entries(), 1);
    assert_eq!(store.get_comment("gone.txt"), None);
    store.save().expect("save");

    let reloaded = load(dir.path());
    assert_eq!(reloaded.get_comment("gone.txt"), None);
    assert_eq!(reloaded.get_comment("present.txt"), Some("kept"));
    assert_eq!(reloaded.get_comment("SUB"), Some("kept too"));
}

#[test]
fn pruning_ignores_names_outside_the_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    let bound = root.path().join("bound");
    fs::create_dir(&bound).expect("mkdir");
    fs::write(bound.join("here.txt"), b"x").expect("write");
    fs::write(root.path().join("outside.txt"), b"x").expect("write");
    let absolute = root.path().join("outside.txt");

    let mut store = DescriptionStore::with_options(&bound, lf_options()).expect("open");
    store.set_comment("here.txt", "kept").expect("set");
    store.set_comment("../outside.txt", "parent").expect("set");
    store
        .set_comment(absolute.to_str().expect("utf-8 path"), "absolute")
        .expect("set");

    assert_eq!(store.remove_orphaned_entries(), 2);
    assert_eq!(store.entries().names().collect::<Vec<_>>(), ["here.txt"]);
}

#[test]
fn sort_orders_names() {
    let fs = MemoryFileSystem::new();
    let mut store =
        DescriptionStore::with_file_system("/mem", lf_options(), fs).expect("open");
    for name in ["beta", "Alpha", "gamma"] {
        store.set_comment(name, name).expect("set");
    }

    store.sort();
    assert_eq!(store.entries().names().collect::<Vec<_>>(), ["Alpha", "beta", "gamma"]);

    store.sort_by(|a, b| b.cmp(a));
    assert_eq!(store.entries().names().collect::<Vec<_>>(), ["gamma", "beta", "Alpha"]);

    store.save().expect("save");
    assert_eq!(
        store.file_system().contents("/mem/descript.ion"),
        Some(b"\xEF\xBB\xBFgamma gamma\nbeta beta\nAlpha Alpha\n".to_vec())
    );
}

#[test]
fn failed_save_keeps_state() {
    let fs = MemoryFileSystem::new();
    let mut store = DescriptionStore::with_file_system("/mem", lf_options(), fs).expect("open");
    store.set_comment("a.txt", "kept").expect("set");

    store.file_system().fail_writes(true);
    let err = store.save().expect_err("save should fail");
    assert!(matches!(err, DescriptError::Io(_)), "unexpected error {:?}", err);
    assert_eq!(store.get_comment("a.txt"), Some("kept"));
    assert_eq!(store.file_system().contents("/mem/descript.ion"), None);
}

#[test]
fn failed_load_keeps_state() {
    let fs = MemoryFileSystem::new()
        .with_file("/mem/descript.ion", b"\xEF\xBB\xBFfolder a\xC2\xA0b\nz.txt last\n".to_vec());
    let mut store = DescriptionStore::with_file_system("/mem", lf_options(), fs).expect("open");
    assert!(store.load().expect("first load"));
    assert_eq!(store.dialect(), Dialect::DoubleCommander);
    assert_eq!(store.encoding(), Some(TextEncoding::Utf8Bom));

    store.file_system().fail_reads(true);
    let err = store.load().expect_err("load should fail");
    assert!(matches!(err, DescriptError::Io(_)), "unexpected error {:?}", err);

    let names: Vec<_> = store.entries().names().collect();
    assert_eq!(names, ["folder", "z.txt"]);
    assert_eq!(store.get_comment("folder"), Some("a\nb"));
    assert_eq!(store.dialect(), Dialect::DoubleCommander);
    assert_eq!(store.encoding(), Some(TextEncoding::Utf8Bom));
    assert!(store.is_loaded());
}

#[test]
fn invalid_arguments_fail_before_io() {
    let fs = MemoryFileSystem::new();
    let mut store = DescriptionStore::with_file_system("/mem", lf_options(), fs).expect("open");

    assert!(matches!(store.set_comment("", "x"), Err(DescriptError::InvalidArgument(_))));
    assert!(matches!(store.set_comment("a\nb", "x"), Err(DescriptError::InvalidArgument(_))));
    assert!(matches!(store.remove_comment(""), Err(DescriptError::InvalidArgument(_))));
    assert!(store.is_empty());

    assert!(matches!(
        DescriptionStore::open(""),
        Err(DescriptError::InvalidArgument(_))
    ));
    assert!(matches!(
        StoreOptions::default().with_fallback_label("no-such-encoding"),
        Err(DescriptError::UnknownEncoding(_))
    ));
    for label in ["utf-16le", "utf-16be", "replacement"] {
        assert!(
            matches!(
                StoreOptions::default().with_fallback_label(label),
                Err(DescriptError::UnsupportedEncoding(_))
            ),
            "fallback {} should be rejected",
            label
        );
    }
    assert!(matches!(
        store.set_encoding(TextEncoding::Legacy(encoding_rs::UTF_16LE)),
        Err(DescriptError::UnsupportedEncoding(_))
    ));
    assert_eq!(store.encoding(), None);
}

#[test]
fn set_comment_normalizes_line_breaks() {
    let fs = MemoryFileSystem::new();
    let mut store = DescriptionStore::with_file_system("/mem", lf_options(), fs).expect("open");
    store.set_comment("a.txt", "one\r\ntwo\rthree").expect("set");
    assert_eq!(store.get_comment("a.txt"), Some("one\ntwo\nthree"));
    assert!(store.remove_comment("A.TXT").expect("remove"));
    assert!(!store.remove_comment("a.txt").expect("remove"));
}

#[test]
fn utf16_encoding_is_preserved_on_save() {
    let dir = copy_fixture("utf16le");
    let mut store = load(dir.path());
    store.set_comment("new.txt", "Added").expect("set");
    store.save().expect("save");

    let bytes = fs::read(dir.path().join("descript.ion")).expect("read");
    assert!(bytes.starts_with(&[0xFF, 0xFE]), "lost UTF-16LE mark");
    assert_eq!(load(dir.path()).get_comment("new.txt"), Some("Added"));
}

#[test]
fn dialect_override_changes_output() {
    let dir = copy_fixture("dc_utf8");
    let mut store = DescriptionStore::with_options(dir.path(), lf_options()).expect("open");
    store.load().expect("load");
    store.set_dialect(Dialect::TotalCommander);
    store.save().expect("save");

    let text = fs::read_to_string(dir.path().join("descript.ion")).expect("read");
    assert!(text.contains("photos My folder\\nwith two lines\u{4}\u{C2}\n"), "got {:?}", text);
    assert_eq!(load(dir.path()).dialect(), Dialect::TotalCommander);
}

#[test]
fn custom_file_name_and_fallback_encoding() {
    let dir = tempfile::tempdir().expect("tempdir");
    // "Привет" in windows-1251
    fs::write(dir.path().join("files.bbs"), b"a.txt \xCF\xF0\xE8\xE2\xE5\xF2\n").expect("write");

    let options = StoreOptions::default()
        .with_file_name("files.bbs")
        .with_fallback_label("cp1251")
        .expect("label");
    let mut store = DescriptionStore::with_options(dir.path(), options).expect("open");
    assert!(store.load().expect("load"));
    assert_eq!(store.get_comment("a.txt"), Some("Привет"));
}

fn cp1251_options() -> StoreOptions {
    lf_options().with_fallback_label("cp1251").expect("label")
}

#[test]
fn cp1251_total_commander_marker_is_stripped() {
    let dir = tempfile::tempdir().expect("tempdir");
    // "Привет" / "мир" in windows-1251, then the 04 C2 marker
    fs::write(
        dir.path().join("descript.ion"),
        b"x.txt \xCF\xF0\xE8\xE2\xE5\xF2\\n\xEC\xE8\xF0\x04\xC2\r\nplain.txt one\r\n",
    )
    .expect("write");

    let mut store = DescriptionStore::with_options(dir.path(), cp1251_options()).expect("open");
    assert!(store.load().expect("load"));
    assert_eq!(store.dialect(), Dialect::TotalCommander);
    assert_eq!(store.get_comment("x.txt"), Some("Привет\nмир"));
    assert_eq!(store.get_comment("plain.txt"), Some("one"));
}

#[test]
fn cp1251_total_commander_marker_is_written_as_bytes() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("descript.ion"), b"old.txt x\n").expect("write");

    let mut store = DescriptionStore::with_options(dir.path(), cp1251_options()).expect("open");
    store.load().expect("load");
    assert!(store.remove_comment("old.txt").expect("remove"));
    store.set_comment("a.txt", "a\nb").expect("set");
    store.save().expect("save");

    let bytes = fs::read(dir.path().join("descript.ion")).expect("read back");
    assert_eq!(bytes, b"a.txt a\\nb\x04\xC2\n");

    let mut reloaded = DescriptionStore::with_options(dir.path(), cp1251_options()).expect("open");
    reloaded.load().expect("reload");
    assert_eq!(reloaded.get_comment("a.txt"), Some("a\nb"));
}

#[test]
fn gb18030_total_commander_marker_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("descript.ion"), b"x.txt a\\nb\x04\xC2\r\n").expect("write");

    let options = lf_options().with_fallback_label("GBK").expect("label");
    let mut store = DescriptionStore::with_options(dir.path(), options).expect("open");
    assert!(store.load().expect("load"));
    assert_eq!(store.get_comment("x.txt"), Some("a\nb"));
    assert_eq!(store.render(), b"x.txt a\\nb\x04\xC2\n");
}

#[test]
fn facade_reads_writes_and_removes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("report final.pdf");

    assert_eq!(descript_ion::read_comment(&target).expect("read"), None);
    descript_ion::write_comment(&target, "Q4\nnumbers").expect("write");
    assert_eq!(
        descript_ion::read_comment(&target).expect("read").as_deref(),
        Some("Q4\nnumbers")
    );

    assert!(descript_ion::remove_comment(&target).expect("remove"));
    assert!(!descript_ion::remove_comment(&target).expect("remove again"));
    assert_eq!(descript_ion::read_comment(&target).expect("read"), None);
}

#[cfg(windows)]
#[test]
fn save_overwrites_hidden_file() {
    use std::os::windows::fs::{MetadataExt, OpenOptionsExt};
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x0000_0002;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("descript.ion");
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .attributes(FILE_ATTRIBUTE_HIDDEN)
        .open(&path)
        .expect("create hidden file");
    std::io::Write::write_all(&mut file, b"a.txt a much longer comment than the new one\r\n")
        .expect("seed hidden file");
    drop(file);

    let mut store = DescriptionStore::with_options(dir.path(), lf_options()).expect("open");
    store.load().expect("load");
    store.set_comment("a.txt", "hidden target").expect("set");
    store.save().expect("save over hidden file");
    assert_eq!(fs::read(&path).expect("read back"), b"a.txt hidden target\n");

    let attributes = fs::metadata(&path).expect("metadata").file_attributes();
    assert_ne!(attributes & FILE_ATTRIBUTE_HIDDEN, 0, "hidden attribute lost");
    assert_eq!(load(dir.path()).get_comment("a.txt"), Some("hidden target"));
}
