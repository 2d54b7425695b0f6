use crate::models::{ProviderProfile, RequestCriteria, ScoringWeights, Urgency};

/// Flat availability points granted to offline providers when the request is
/// not urgent. Medium/high urgency gets nothing, which keeps offline profiles
/// out of the top ranks when the client needs someone now.
const OFFLINE_LOW_URGENCY_BONUS: f64 = 5.0;

/// Response times at or past this many minutes score zero speed points.
const RESPONSE_DECAY_MINUTES: f64 = 30.0;

/// Years of experience that trigger the flat experience bonus.
const EXPERIENCE_BONUS_YEARS: u8 = 10;

/// Success rate that triggers the flat success bonus.
const SUCCESS_BONUS_RATE: f64 = 90.0;

/// Calculate a match score for a provider against one request
///
/// Scoring is additive across independently weighted factors:
///
/// - category fit      (≤ weights.category, neutral 0.5 on empty request)
/// - price fit         (≤ weights.price, linear toward 0 at the max)
/// - rating fit        (≤ weights.rating, proportional to rating/5)
/// - availability      (≤ weights.availability, offline flat bonus on low urgency)
/// - response speed    (≤ weights.response, linear decay over 30 minutes)
/// - client affinity   (+ weights.affinity / − weights.avoid_penalty)
/// - flat bonuses for long experience and high success rate
///
/// The ceilings are not normalized to 100; see `ScoringWeights`.
///
/// Returns the score together with the human-readable reasons the UI shows
/// next to the match.
pub fn calculate_match_score(
    provider: &ProviderProfile,
    criteria: &RequestCriteria,
    past_successes: &[String],
    weights: &ScoringWeights,
) -> (f64, Vec<String>) {
    let mut score = 0.0;
    let mut reasons = Vec::new();

    // Category fit
    let fit = category_fit(&criteria.preferred_categories, &provider.categories);
    score += fit * weights.category;
    if !criteria.preferred_categories.is_empty() && fit > 0.0 {
        if fit >= 1.0 {
            reasons.push("Specializzazione perfetta".to_string());
        } else {
            reasons.push("Specializzazione affine alla richiesta".to_string());
        }
    }

    // Price fit: skipped entirely when the provider is over budget
    match criteria.max_price_per_minute {
        Some(max) if provider.price_per_minute <= max => {
            let factor = if max > 0.0 {
                (1.0 - provider.price_per_minute / max).max(0.0)
            } else {
                0.0
            };
            score += factor * weights.price;
            if factor >= 0.5 {
                reasons.push("Prezzo conveniente".to_string());
            }
        }
        Some(_) => {}
        None => {
            score += 0.8 * weights.price;
        }
    }

    // Rating fit: skipped when below the requested minimum
    let meets_min_rating = criteria
        .min_rating
        .map_or(true, |min| provider.rating >= min);
    if meets_min_rating {
        score += (provider.rating / 5.0) * weights.rating;
        if provider.rating >= 4.5 {
            reasons.push("Valutazioni eccellenti".to_string());
        }
    }

    // Availability
    if provider.online {
        let capacity = 1.0 - provider.load_percent as f64 / 100.0;
        score += capacity * weights.availability;
        if provider.load_percent <= 30 {
            reasons.push("Subito disponibile".to_string());
        } else {
            reasons.push("Disponibile online".to_string());
        }
    } else if criteria.urgency == Urgency::Low {
        score += OFFLINE_LOW_URGENCY_BONUS;
    }

    // Response speed
    score += response_speed_factor(provider.avg_response_minutes) * weights.response;
    if provider.avg_response_minutes <= 5 {
        reasons.push("Risposta rapida".to_string());
    }

    // Client affinity: a recorded successful consultation takes precedence
    // over the avoid-list penalty
    if past_successes.iter().any(|id| *id == provider.id) {
        score += weights.affinity;
        reasons.push("Già consultato con successo".to_string());
    } else if criteria
        .avoided_provider_ids
        .iter()
        .any(|id| *id == provider.id)
    {
        score -= weights.avoid_penalty;
    }

    // Track-record bonuses
    if provider.years_experience >= EXPERIENCE_BONUS_YEARS {
        score += weights.experience_bonus;
        reasons.push("Esperienza pluriennale".to_string());
    }
    if provider.success_rate >= SUCCESS_BONUS_RATE {
        score += weights.success_bonus;
        reasons.push("Alto tasso di successo".to_string());
    }

    // Language preference is explanation-only, it carries no points
    if !criteria.preferred_languages.is_empty()
        && criteria.preferred_languages.iter().any(|wanted| {
            provider
                .languages
                .iter()
                .any(|spoken| spoken.eq_ignore_ascii_case(wanted))
        })
    {
        reasons.push("Parla la tua lingua".to_string());
    }

    (score, reasons)
}

/// Fraction of requested categories that fuzzy-match the provider's tags
///
/// An empty request defaults to a neutral 0.5 so providers are not zeroed out
/// when the client has no stated preference.
#[inline]
pub fn category_fit(requested: &[String], offered: &[String]) -> f64 {
    if requested.is_empty() {
        return 0.5;
    }

    let matched = requested
        .iter()
        .filter(|want| offered.iter().any(|have| fuzzy_tag_match(want, have)))
        .count();

    matched as f64 / requested.len() as f64
}

/// Case-insensitive substring match in either direction
#[inline]
pub fn fuzzy_tag_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a.contains(&b) || b.contains(&a)
}

/// Response speed factor (0-1), linear from 1 at 0 minutes to 0 at 30+
#[inline]
pub fn response_speed_factor(avg_response_minutes: u32) -> f64 {
    (1.0 - avg_response_minutes as f64 / RESPONSE_DECAY_MINUTES).clamp(0.0, 1.0)
}

/// Estimated wait in minutes before the consultation can start
///
/// Online providers wait on response time plus a load surcharge; offline
/// providers are assumed to need at least a quarter hour. A heuristic, not a
/// queueing estimate.
#[inline]
pub fn estimate_wait_minutes(provider: &ProviderProfile) -> u32 {
    if provider.online {
        (provider.avg_response_minutes + provider.load_percent as u32 / 10).max(1)
    } else {
        provider.avg_response_minutes.max(15)
    }
}
