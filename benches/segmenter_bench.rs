use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lectern::sentence_detector::SentenceDetector;
use lectern::{paragraph_range_at, segment, sentence_index_for, word_range_at};

const SIMPLE_TEXT: &str = "Hello world. This is a test. How are you?";
const COMPLEX_TEXT: &str = r#"
    "Mr. & Mrs. Smith," she said, "went to Washington at 9 a.m. last week."
    He replied, 'I saw them there... it was odd.' The U.S. team won 3.5 to 2!
"#;

// WHY: repeated mixed prose gives a stable multi-paragraph document without fixture files
fn long_text() -> String {
    let paragraph = "Dr. Watson arrived at 5 p.m. sharp. The fee was 12.50 dollars, \
                     e.g. more than expected... but fair. \"Why?\" he asked. Nobody answered.\n\n";
    paragraph.repeat(2_000)
}

fn bench_sentence_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("sentence_detection");
    let detector = SentenceDetector::with_default_rules();

    group.bench_function("detector_construction", |b| {
        b.iter(|| black_box(SentenceDetector::with_default_rules()))
    });

    group.bench_function("simple_text", |b| {
        b.iter(|| black_box(detector.detect_sentences(black_box(SIMPLE_TEXT))))
    });

    group.bench_function("complex_text", |b| {
        b.iter(|| black_box(detector.detect_sentences(black_box(COMPLEX_TEXT))))
    });

    group.finish();
}

fn bench_throughput(c: &mut Criterion) {
    let text = long_text();
    let mut group = c.benchmark_group("throughput");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.sample_size(20); // WHY: long document makes each iteration slow enough

    group.bench_function("segment_long_text", |b| {
        b.iter(|| black_box(segment(black_box(&text))))
    });

    group.finish();
}

fn bench_position_queries(c: &mut Criterion) {
    let text = long_text();
    let spans = segment(&text);
    let offsets: Vec<usize> = (0..text.len()).step_by(997).collect();
    let mut group = c.benchmark_group("position_queries");

    group.bench_function("sentence_index_for", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(sentence_index_for(&spans, &text, offset));
            }
        })
    });

    group.bench_function("word_range_at", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(word_range_at(&text, offset));
            }
        })
    });

    group.bench_function("paragraph_range_at", |b| {
        b.iter(|| {
            for &offset in &offsets {
                black_box(paragraph_range_at(&text, offset));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sentence_detection, bench_throughput, bench_position_queries);
criterion_main!(benches);
