use crate::AppState;
use crate::db::{self, Factoid, LifestyleTip};
use crate::handlers::error::ApiError;
use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

pub async fn hub() -> Json<Value> {
    Json(json!({
        "title": "Vitamin D & Brain Health",
        "description": "Low vitamin D has been associated with smaller brain volumes and poorer cognitive scores in observational research. Sun exposure, skin type, season, clothing coverage, and diet/supplements all influence your vitamin D status.",
        "factors": [
            { "title": "Sun exposure", "description": "time outdoors between 10am-3pm" },
            { "title": "Skin type", "description": "darker skin synthesises vitamin D more slowly" },
            { "title": "Location & season", "description": "southern states in winter have lower UV" },
            { "title": "Clothing coverage", "description": "more covered = less UV to skin" },
            { "title": "Diet & supplements", "description": "oily fish, fortified milk/margarine, eggs; supplements can help" }
        ]
    }))
}

pub async fn disclaimer() -> Json<Value> {
    Json(json!({
        "title": "Supplementation Disclaimer",
        "content": "This tool provides general information only and should not replace professional medical advice. Please consult with a healthcare provider before starting any vitamin D supplementation."
    }))
}

pub async fn learn_more() -> Json<Value> {
    Json(json!({
        "title": "Learn More About Vitamin D",
        "sources": [
            { "name": "UniSA - Research news on vitamin D & brain health", "url": "https://www.unisa.edu.au/Media-Centre/News/" },
            { "name": "ABS - Australian Health Survey (general health stats)", "url": "https://www.abs.gov.au/" },
            { "name": "SBS Health - Public-facing explainers and news", "url": "https://www.sbs.com.au/news/health" }
        ],
        "cards": [
            { "title": "Vitamin D & Brain Function", "text": "Research suggests vitamin D receptors in the brain may influence cognitive performance." },
            { "title": "Sun Exposure Guidelines", "text": "Safe sun exposure varies by skin type, location, and season." },
            { "title": "Dietary Sources", "text": "Oily fish, fortified foods, and supplements can help maintain vitamin D levels." }
        ]
    }))
}

pub async fn dashboard() -> Json<Value> {
    Json(json!({
        "title": "Data Awareness Dashboard",
        "description": "Explore vitamin D facts and lifestyle tips"
    }))
}

/// Active factoids in display order
pub async fn factoids(State(state): State<AppState>) -> Result<Json<Vec<Factoid>>, ApiError> {
    Ok(Json(db::get_active_factoids(&state.pool).await?))
}

/// Active lifestyle tips in display order
pub async fn tips(State(state): State<AppState>) -> Result<Json<Vec<LifestyleTip>>, ApiError> {
    Ok(Json(db::get_active_tips(&state.pool).await?))
}
