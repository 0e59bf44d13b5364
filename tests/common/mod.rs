#![allow(dead_code)]

use news_classifier::{Document, Pipeline, PipelineConfig, TrainerConfig};

pub const HOAX_WORDS: [&str; 10] = [
    "wajib", "denda", "penjara", "viral", "sebarkan", "segera", "rahasia", "heboh", "terbukti",
    "mengerikan",
];

pub const VALID_WORDS: [&str; 10] = [
    "pemerintah", "resmi", "pembangunan", "infrastruktur", "jalan", "tol", "kementerian",
    "laporan", "anggaran", "program",
];

const SHARED_WORDS: [&str; 3] = ["berita", "hari", "ini"];

/// 100 documents, 50 per label, alternating, with disjoint class vocabularies
pub fn corpus() -> Vec<Document> {
    (0..100)
        .map(|i| {
            let (label, words) = if i % 2 == 0 {
                ("hoax", &HOAX_WORDS)
            } else {
                ("valid", &VALID_WORDS)
            };
            let mut tokens: Vec<&str> = (0..5).map(|j| words[(i * 3 + j * 7) % 10]).collect();
            tokens.push(SHARED_WORDS[i % 3]);
            Document::new(label, tokens.join(" "))
        })
        .collect()
}

pub fn config() -> PipelineConfig {
    PipelineConfig {
        trainer: TrainerConfig {
            max_epochs: 1000,
            ..TrainerConfig::default()
        },
        ..PipelineConfig::default()
    }
}

pub fn pipeline() -> Pipeline {
    Pipeline::new(config()).unwrap()
}

pub fn sample_texts() -> Vec<&'static str> {
    vec![
        "Semua warga wajib membayar denda atau dipenjara",
        "Pemerintah meresmikan jalan tol baru",
        "viral heboh sebarkan segera",
        "laporan anggaran kementerian",
        "berita hari ini",
        "",
        "kata yang tidak pernah muncul",
        "RAHASIA!!! terbukti, mengerikan...",
        "program pembangunan infrastruktur resmi",
        "denda jalan viral tol",
    ]
}
