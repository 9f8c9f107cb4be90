// SPDX-License-Identifier: MIT
// Copyright 2026 The Lumora Authors

use std::sync::Arc;

use crate::services::llm::{ChatPrompt, LanguageModel};

/// Activity labels offered to the model.
pub const ACTIVITY_LABELS: &[&str] = &[
    "soccer",
    "basketball",
    "swimming",
    "tennis",
    "running",
    "gym",
    "park",
    "other",
];

/// Label returned when the model cannot be reached.
pub const FALLBACK_ACTIVITY: &str = "other";

pub fn categorize_prompt(name: &str, description: &str) -> String {
    format!(
        "Classify the following spot into one of these activities: {}.\n\
         Return only the activity name.\n\
         Spot: {name}\n\
         Description: {description}",
        ACTIVITY_LABELS.join(", ")
    )
}

/// Assigns an activity label to a recreation spot.
#[derive(Clone)]
pub struct SpotCategorizer {
    llm: Arc<dyn LanguageModel>,
}

impl SpotCategorizer {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Trimmed, lower-cased model reply. Not checked against [`ACTIVITY_LABELS`].
    pub async fn categorize(&self, name: &str, description: &str) -> String {
        let prompt = ChatPrompt::user(categorize_prompt(name, description));
        match self.llm.complete(&prompt).await {
            Ok(reply) => reply.trim().to_lowercase(),
            Err(e) => {
                tracing::warn!(error = %e, spot = name, "Categorization failed");
                FALLBACK_ACTIVITY.to_string()
            }
        }
    }
}
