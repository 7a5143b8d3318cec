#![allow(
  clippy::expect_used,
  clippy::unwrap_used,
  reason = "Fine in benchmarks"
)]
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio_render::{ContentProcessor, ProcessorOptions};

const DOC_SMALL: &str = r#"<h1>Welcome</h1>
<p>This is a short note that links to <a href="doc:getting-started">the guide</a>.</p>"#;

const DOC_SECTION: &str = r#"<h2>Section Title</h2>
<p>Paragraph with <strong>bold</strong>, <em>emphasis</em> and a
<a href="https://example.com">link out</a>, plus one to
<a href="doc:reference">another document</a>.</p>
<h3>Example</h3>
<pre><code class="language-rust">fn main() {
    let values: Vec<u32> = (0..10).collect();
    println!("{values:?}");
}
</code></pre>
"#;

fn large_document() -> String {
  let mut html = String::from("<h1>Handbook</h1>\n");
  for _ in 0..50 {
    html.push_str(DOC_SECTION);
  }
  html
}

fn bench_process(c: &mut Criterion) {
  let large = large_document();
  let inputs = [("small", DOC_SMALL), ("large", large.as_str())];

  let mut group = c.benchmark_group("process");
  for highlight_code in [false, true] {
    let processor = ContentProcessor::new(ProcessorOptions {
      highlight_code,
      ..Default::default()
    });
    let label = if highlight_code { "highlight" } else { "plain" };

    for (name, input) in inputs {
      group.bench_with_input(
        BenchmarkId::new(label, name),
        input,
        |b, input| {
          b.iter(|| processor.process(black_box(input)).unwrap());
        },
      );
    }
  }
  group.finish();
}

criterion_group!(benches, bench_process);
criterion_main!(benches);
