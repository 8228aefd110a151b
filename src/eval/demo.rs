//! Canned responses for credential-free demo runs.

use crate::inquiry::{Inquiry, Language};
use crate::responder::GroundedResponse;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;

const BASELINE_RESPONSES: [&str; 4] = [
    "Thank you for your interest. HEALO can help connect you with qualified clinics. Could you tell me your preferred treatment and travel dates?",
    "We'd be happy to assist. Please share a bit more about your goals and we'll guide you to submit an inquiry.",
    "HEALO offers concierge services for medical tourism. What procedure are you considering?",
    "To better assist you, could you specify your treatment of interest and whether you've visited Korea before?",
];

const GROUNDED_TEMPLATES: [&str; 3] = [
    "Based on our partner clinic information, {treatment} options are available in Seoul and Gangnam. Costs vary by clinic; we can match you with suitable providers. Would you like to submit an inquiry?",
    "Our records show several hospitals offering {treatment} in Gangnam and Seoul. HEALO can arrange a consultation. Shall we proceed with an inquiry form?",
    "We have {treatment}-focused clinics in our network. Typical recovery and pricing depend on the specific plan. Submit an inquiry and we'll follow up.",
];

/// Fixed context the grounded demo answers are written against.
pub fn mock_context(language: Language) -> &'static str {
    match language {
        Language::En => {
            "[treatment] Rhinoplasty, dental implants, breast augmentation. [hospital] Partner clinics in Gangnam, Seoul. [source] HEALO medical concierge database."
        }
        Language::Ja => {
            "[treatment] 鼻形成、インプラント、豊胸。 [hospital] 江南・ソウル提携クリニック。 [source] HEALO医療コンシェルジュデータベース。"
        }
        Language::Ko => {
            "[treatment] 코성형, 임플란트, 가슴성형. [hospital] 강남·서울 제휴 병원. [source] HEALO 메디컬 컨시어지 DB."
        }
    }
}

fn treatment_word(language: Language) -> &'static str {
    match language {
        Language::En => "treatment",
        Language::Ja => "治療",
        Language::Ko => "치료",
    }
}

/// Seeded picker over the canned replies.
#[derive(Debug)]
pub struct DemoResponses {
    rng: StdRng,
}

impl DemoResponses {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, options: &[&'static str]) -> &'static str {
        options.choose(&mut self.rng).copied().unwrap_or_default()
    }

    /// A generic concierge reply that ignores the inquiry.
    pub fn baseline(&mut self, _inquiry: &Inquiry) -> String {
        self.pick(&BASELINE_RESPONSES).to_string()
    }

    /// A reply that reuses wording from the mock context.
    pub fn grounded(&mut self, inquiry: &Inquiry) -> GroundedResponse {
        let template = self.pick(&GROUNDED_TEMPLATES);
        GroundedResponse {
            text: template.replace("{treatment}", treatment_word(inquiry.language)),
            context: mock_context(inquiry.language).to_string(),
            normalized: json!({
                "source_type": "ai_agent",
                "language": inquiry.language.code(),
                "demo": true,
            }),
        }
    }
}
