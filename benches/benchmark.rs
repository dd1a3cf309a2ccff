use criterion::{criterion_group, criterion_main, Criterion};
use gitas::core::{common_prefix, find_repositories, name_repositories};
use gitas::git::{StatusFields, StatusOptions, SystemRunner};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn setup_many_repos(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for i in 0..count {
        let repo_path = root.join(format!("group-{}", i % 5)).join(format!("repo-{}", i));
        fs::create_dir_all(repo_path.join("src")).unwrap();
        Command::new("git")
            .arg("init")
            .arg("-q")
            .current_dir(&repo_path)
            .output()
            .unwrap();
    }

    temp_dir
}

fn bench_discovery(c: &mut Criterion) {
    let count = 50;
    let temp_dir = setup_many_repos(count);
    let path = temp_dir.path().to_path_buf();

    c.bench_function("discovery_50_repos", |b| {
        b.iter(|| find_repositories(&SystemRunner, &path, false).unwrap())
    });
}

fn bench_naming(c: &mut Criterion) {
    let paths: Vec<PathBuf> = (0..1000)
        .map(|i| PathBuf::from(format!("/home/me/src/group-{}/repo-{}", i % 7, i)))
        .collect();

    c.bench_function("common_prefix_1000_paths", |b| b.iter(|| common_prefix(&paths)));
    c.bench_function("name_1000_repositories", |b| {
        b.iter(|| name_repositories(&paths))
    });
}

fn bench_porcelain(c: &mut Criterion) {
    let mut porcelain = String::from(
        "# branch.oid 4b825dc642cb6eb9a060e54bf8d69288fbee4904\n\
         # branch.head main\n\
         # branch.upstream origin/main\n\
         # branch.ab +3 -1\n\
         # stash 2\n",
    );
    for i in 0..500 {
        porcelain.push_str(&format!(
            "1 .M N... 100644 100644 100644 e69de29 e69de29 src/file{i}.rs\n"
        ));
        porcelain.push_str(&format!("? scratch/{i}.txt\n"));
    }
    let options = StatusOptions {
        dirty: true,
        untracked: true,
        stash: true,
        branch_head: true,
        branch_upstream: true,
        include_nested: false,
    };

    c.bench_function("parse_porcelain_1000_lines", |b| {
        b.iter(|| StatusFields::from_porcelain(&porcelain, &options).unwrap())
    });
}

criterion_group!(benches, bench_discovery, bench_naming, bench_porcelain);
criterion_main!(benches);
