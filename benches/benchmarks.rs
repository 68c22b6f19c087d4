use criterion::{black_box, criterion_group, criterion_main, Criterion};

use webget::formats::has_resource_extension;
use webget::rewriter::{apply_splices, relative_to, Splice};
use webget::LinkScanner;

fn bench_link_scanning(c: &mut Criterion) {
    let html_content = r#"
        <html>
            <head>
                <link rel="stylesheet" href="/style.css">
                <script src="/script.js"></script>
                <link rel="stylesheet" href="/theme.css">
                <script src="//cdn.example.com/utils.js"></script>
                <meta content="https://example.com/preview.png">
            </head>
            <body>
                <img src="/logo.png" alt="Logo">
                <img src="/banner.jpg" alt="Banner">
                <a href="/about">About</a>
                <a href="/contact">Contact</a>
                <a href="https://example.com/products">Products</a>
            </body>
        </html>
    "#;
    let scanner = LinkScanner::new();

    c.bench_function("scan_links", |b| {
        b.iter(|| {
            let _container = scanner.scan(black_box(html_content));
        });
    });
}

fn bench_extension_classification(c: &mut Criterion) {
    let links = [
        "/img/photo.png",
        "/img/photo.PNG",
        "/about/team",
        "https://cdn.example.com/app.js",
        "//cdn.example.com/style.css",
        "/download/archive.tar",
        "/blog/2024/some-post",
    ];

    c.bench_function("classify_extensions", |b| {
        b.iter(|| {
            for link in &links {
                let _is_resource = has_resource_extension(black_box(link));
            }
        });
    });
}

fn bench_relative_paths(c: &mut Criterion) {
    let cases = [
        ("data/example.com/blog", "data/example.com/img/a.png"),
        ("data/example.com", "data/cdn.test/app.js"),
        ("data/example.com/a/b/c", "data/example.com/a/x.css"),
        ("data/example.com", "data/example.com/f/g"),
    ];

    c.bench_function("relative_paths", |b| {
        b.iter(|| {
            for (target, resource) in &cases {
                let _rel = relative_to(black_box(target), black_box(resource)).unwrap();
            }
        });
    });
}

fn bench_splice_application(c: &mut Criterion) {
    let src: Vec<u8> = (0..4096).map(|i| (i % 251) as u8).collect();
    let splices: Vec<Splice> = (0..16)
        .map(|i| Splice {
            start: i * 200,
            original_len: 10,
            replacement: "../replaced/link.css".to_string(),
        })
        .collect();

    c.bench_function("apply_splices", |b| {
        b.iter(|| {
            let _out = apply_splices(black_box(&src), black_box(&splices)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_link_scanning,
    bench_extension_classification,
    bench_splice_application,
    bench_relative_paths,
);
criterion_main!(benches);
