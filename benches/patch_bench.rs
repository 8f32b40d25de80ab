use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indoc::indoc;
use std::collections::HashMap;
use std::path::PathBuf;

use unipatch::{apply_patch, parse_only, FileSnapshot, InMemoryBackend};

fn parsing_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Parsing");

    let simple_patch = indoc! {"
        *** Begin Patch
        *** Update File: main.rs
        -    println!(\"Hello, world!\");
        +    println!(\"Hello, unipatch!\");
        *** End Patch
    "};
    let mut simple_snapshot: FileSnapshot = HashMap::new();
    simple_snapshot.insert(
        PathBuf::from("main.rs"),
        "fn main() {\n    println!(\"Hello, world!\");\n}".to_string(),
    );
    group.bench_function("simple_update", |b| {
        b.iter(|| parse_only(black_box(simple_patch), black_box(&simple_snapshot)).unwrap())
    });

    // A single file with many anchored hunks.
    let mut large_file = String::new();
    for i in 0..200 {
        large_file.push_str(&format!("line number {i}\n"));
    }
    let mut large_patch = "*** Begin Patch\n*** Update File: large.txt\n".to_string();
    for i in (0..200).step_by(5) {
        large_patch.push_str(&format!(
            "@@ line number {i}\n-line number {}\n+replaced line {}\n",
            i + 1,
            i + 1
        ));
    }
    large_patch.push_str("*** End Patch\n");
    let mut large_snapshot: FileSnapshot = HashMap::new();
    large_snapshot.insert(PathBuf::from("large.txt"), large_file);
    group.bench_function("many_anchored_hunks", |b| {
        b.iter(|| parse_only(black_box(&large_patch), black_box(&large_snapshot)).unwrap())
    });

    // A large add-file section.
    let mut large_add = "*** Begin Patch\n*** Add File: generated.txt\n".to_string();
    for i in 0..2000 {
        large_add.push_str(&format!("+line {i}\n"));
    }
    large_add.push_str("*** End Patch\n");
    let empty_snapshot: FileSnapshot = HashMap::new();
    group.bench_function("large_add_file", |b| {
        b.iter(|| parse_only(black_box(&large_add), black_box(&empty_snapshot)).unwrap())
    });

    group.finish();
}

fn applying_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("Applying");

    group.bench_function("file_creation", |b| {
        let text = indoc! {"
            *** Begin Patch
            *** Add File: new_file.txt
            +Hello
            +New World
            *** End Patch
        "};
        b.iter(|| {
            let backend = InMemoryBackend::new();
            black_box(apply_patch(black_box(text), black_box(&backend))).unwrap();
        });
    });

    let mut large_file_content = String::new();
    for i in 0..10000 {
        large_file_content.push_str(&format!("This is line number {i}\n"));
    }
    let exact_text = indoc! {"
        *** Begin Patch
        *** Update File: large_file.txt
        -This is line number 5001
        +THIS LINE WAS CHANGED
        *** End Patch
    "};
    group.bench_function("exact_match_large_file", |b| {
        b.iter(|| {
            let backend = InMemoryBackend::with_files([(
                PathBuf::from("large_file.txt"),
                large_file_content.clone(),
            )]);
            black_box(apply_patch(black_box(exact_text), black_box(&backend))).unwrap();
        });
    });

    // Fuzzy match path: trailing-whitespace variance forces the second pass.
    let fuzzy_content = large_file_content.replace(
        "This is line number 5001\n",
        "This is line number 5001   \n",
    );
    group.bench_function("trailing_whitespace_fuzzy_match", |b| {
        b.iter(|| {
            let backend = InMemoryBackend::with_files([(
                PathBuf::from("large_file.txt"),
                fuzzy_content.clone(),
            )]);
            black_box(apply_patch(black_box(exact_text), black_box(&backend))).unwrap();
        });
    });

    let repetitive_content = "println!(\"hello world\");\n".repeat(10000);
    let worst_case_text = indoc! {"
        *** Begin Patch
        *** Update File: repetitive.txt
         println!(\"hello world\");
        -this line never appears in the file
        +this insertion will never be placed
        *** End Patch
    "};
    group.bench_function("no_match_worst_case_full_scan", |b| {
        b.iter(|| {
            let backend = InMemoryBackend::with_files([(
                PathBuf::from("repetitive.txt"),
                repetitive_content.clone(),
            )]);
            let _ = black_box(apply_patch(black_box(worst_case_text), black_box(&backend)));
        });
    });

    group.finish();
}

criterion_group!(benches, parsing_benches, applying_benches);
criterion_main!(benches);
