// Criterion benchmarks for Consulto Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use chrono::{TimeZone, Utc};
use consulto_algo::core::scoring::calculate_match_score;
use consulto_algo::core::similarity::SimilarityModel;
use consulto_algo::core::Engine;
use consulto_algo::models::{
    ConsultationMode, ConsultationRecord, ProviderProfile, RequestCriteria, ScoringWeights,
    Urgency,
};

const CATEGORIES: [&str; 5] = ["Tarot", "Cartomancy", "Astrology", "Numerology", "Runes"];

fn create_provider(id: usize) -> ProviderProfile {
    ProviderProfile {
        id: format!("p{}", id),
        display_name: format!("Consulente {}", id),
        categories: vec![CATEGORIES[id % CATEGORIES.len()].to_string()],
        price_per_minute: 1.0 + (id % 5) as f64,
        rating: 3.0 + (id % 4) as f64 * 0.5,
        languages: vec!["it".to_string()],
        online: id % 3 != 0,
        load_percent: ((id * 13) % 100) as u8,
        avg_response_minutes: (id % 20) as u32,
        success_rate: 70.0 + (id % 30) as f64,
        specialties: vec![],
        years_experience: (id % 25) as u8,
        last_active: None,
    }
}

fn create_criteria() -> RequestCriteria {
    RequestCriteria {
        client_id: "bench_client".to_string(),
        preferred_categories: vec!["Tarot".to_string()],
        max_price_per_minute: Some(4.0),
        min_rating: Some(3.5),
        preferred_languages: vec![],
        avoided_provider_ids: vec![],
        urgency: Urgency::Medium,
        mode: ConsultationMode::Chat,
    }
}

fn bench_match_score(c: &mut Criterion) {
    let provider = create_provider(1);
    let criteria = create_criteria();
    let weights = ScoringWeights::default();

    c.bench_function("calculate_match_score", |b| {
        b.iter(|| {
            calculate_match_score(
                black_box(&provider),
                black_box(&criteria),
                black_box(&[]),
                black_box(&weights),
            )
        });
    });
}

fn bench_find_best_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_best_matches");

    for count in [100, 500, 1000] {
        let mut engine = Engine::with_default_weights();
        for i in 0..count {
            engine.register_provider(create_provider(i));
        }
        let criteria = create_criteria();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| engine.find_best_matches(black_box(&criteria)));
        });
    }

    group.finish();
}

fn bench_similarity_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity_rebuild");

    for count in [50, 200] {
        let providers: Vec<ProviderProfile> = (0..count).map(create_provider).collect();
        let refs: Vec<&ProviderProfile> = providers.iter().collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                let mut model = SimilarityModel::new();
                model.rebuild(black_box(&refs));
                model
            });
        });
    }

    group.finish();
}

fn bench_generate_recommendations(c: &mut Criterion) {
    let mut engine = Engine::with_default_weights();
    for i in 0..200 {
        engine.register_provider(create_provider(i));
    }
    for i in 0..10 {
        engine.update_user_behavior(
            "bench_client",
            ConsultationRecord {
                provider_id: format!("p{}", i),
                category: CATEGORIES[i % CATEGORIES.len()].to_string(),
                rating_given: 4.5,
                duration_minutes: 20,
                cost: 30.0,
                timestamp: Utc.with_ymd_and_hms(2024, 6, 10, 20, 0, 0).unwrap(),
            },
        );
    }
    // Warm the similarity matrix so the loop measures generation alone
    engine.generate_recommendations("bench_client");

    c.bench_function("generate_recommendations", |b| {
        b.iter(|| engine.generate_recommendations(black_box("bench_client")));
    });
}

criterion_group!(
    benches,
    bench_match_score,
    bench_find_best_matches,
    bench_similarity_rebuild,
    bench_generate_recommendations
);
criterion_main!(benches);
