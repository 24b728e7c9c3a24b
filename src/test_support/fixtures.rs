//! Test fixtures: fake Visual Studio installs, source trees and b2 output.

use std::fs;
use std::path::{Path, PathBuf};

/// A fake pre-2017 Visual Studio layout under `root`.
///
/// Returns `(COMNTOOLS value, vcvarsall.bat path)`.
pub fn fake_vs_install(root: &Path) -> (PathBuf, PathBuf) {
    let tools = root.join("Common7").join("Tools");
    let vc = root.join("VC");
    fs::create_dir_all(&tools).unwrap();
    fs::create_dir_all(&vc).unwrap();
    let vcvarsall = vc.join("vcvarsall.bat");
    fs::write(&vcvarsall, "@echo off\r\n").unwrap();
    (tools, vcvarsall)
}

/// A boost checkout with a `boost` header dir and optional zlib next to it.
///
/// Layout: `<root>/boost_inuse/boost/`, `<root>/zlib/win32|win64/{lib,include}`.
pub fn fake_boost_tree(root: &Path, with_zlib: &[&str]) -> PathBuf {
    let boost_dir = root.join("boost_inuse");
    fs::create_dir_all(boost_dir.join("boost")).unwrap();
    fs::write(boost_dir.join("bootstrap.bat"), "@echo off\r\n").unwrap();
    for flavour in with_zlib {
        let zlib = root.join("zlib").join(flavour);
        fs::create_dir_all(zlib.join("lib")).unwrap();
        fs::create_dir_all(zlib.join("include")).unwrap();
    }
    boost_dir
}

/// Output of `b2 --show-libraries` listing `libs`.
pub fn b2_show_libraries(libs: &[&str]) -> String {
    let mut out = String::from("The following libraries require building:\r\n");
    for lib in libs {
        out.push_str(&format!("    - {}\r\n", lib));
    }
    out
}

/// A source tree with files the formatter should and should not touch.
///
/// Returns `(root, matching files)`.
pub fn source_tree(root: &Path) -> (PathBuf, Vec<PathBuf>) {
    let base = root.join("projects");
    let matching = [
        "LibShare/include/Log/FileLog.h",
        "LibShare/include/DataStructure/tree_node.hpp",
        "LibShare/include/Config/JsonUtility.inl",
        "LibShare/src/Log/FileLog.cpp",
        "LibShare/src/Memory/compress_utility.cc",
        "LibShareTest/src/main.c",
    ];
    let other = [
        "LibShare/CMakeLists.txt",
        "LibShare/src/Log/notes.md",
        "LibShareTest/res/icon.ico",
        "LibShareTest/.clang-format",
    ];

    let mut files = Vec::new();
    for rel in matching {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "int x;\n").unwrap();
        files.push(path);
    }
    for rel in other {
        let path = base.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "text\n").unwrap();
    }
    // A directory whose name looks like a source file must not be formatted.
    fs::create_dir_all(base.join("LibShare/legacy.cpp")).unwrap();

    files.sort();
    (base, files)
}
