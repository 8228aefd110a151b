//! Synthetic multilingual inquiries.
//!
//! Inquiries are generated round-robin over English, Japanese and Korean
//! from a fixed table of twenty templates per language, so a given count
//! always yields the same list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Inquiry language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ja,
    Ko,
}

impl Language {
    /// Generation order.
    pub const ALL: [Language; 3] = [Language::En, Language::Ja, Language::Ko];

    /// Two-letter code used by the content store and CSV output.
    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ja => "ja",
            Language::Ko => "ko",
        }
    }

    /// Coarse keyword sniff over a free-form language hint.
    ///
    /// Anything mentioning "ko"/"kr"/"korean" is Korean, then
    /// "ja"/"jp"/"japanese" is Japanese, otherwise English.
    pub fn detect(hint: &str) -> Self {
        let v = hint.to_lowercase();
        if v.contains("ko") || v.contains("kr") || v.contains("korean") {
            Language::Ko
        } else if v.contains("ja") || v.contains("jp") || v.contains("japanese") {
            Language::Ja
        } else {
            Language::En
        }
    }

    fn templates(self) -> &'static [&'static str; 20] {
        match self {
            Language::En => &EN_TEMPLATES,
            Language::Ja => &JA_TEMPLATES,
            Language::Ko => &KO_TEMPLATES,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "ja" => Ok(Language::Ja),
            "ko" => Ok(Language::Ko),
            other => Err(format!("unsupported language '{}'", other)),
        }
    }
}

/// A single synthetic user inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    /// 1-based identifier.
    pub id: u32,
    pub text: String,
    pub language: Language,
}

/// Suffix rotation for live runs. The first two slots both leave the
/// template untouched.
pub const LIVE_SUFFIXES: &[&str] = &["", "", " Please help me.", " I need more information."];

/// Suffix rotation for demo runs.
pub const DEMO_SUFFIXES: &[&str] = &["", " Please help me.", " I need more information."];

/// Generate `count` inquiries, cycling languages, templates and suffixes.
pub fn generate_inquiries(count: usize, suffixes: &[&str]) -> Vec<Inquiry> {
    let langs = Language::ALL;
    (0..count)
        .map(|i| {
            let language = langs[i % langs.len()];
            let templates = language.templates();
            let base = templates[(i / langs.len()) % templates.len()];
            let suffix = if suffixes.is_empty() {
                ""
            } else {
                suffixes[i % suffixes.len()]
            };
            Inquiry {
                id: (i + 1) as u32,
                text: format!("{}{}", base, suffix),
                language,
            }
        })
        .collect()
}

const EN_TEMPLATES: [&str; 20] = [
    "I'm interested in getting a rhinoplasty in Seoul. What's the typical cost?",
    "Do you have any hospitals that specialize in dental implants?",
    "I need a consultation for breast augmentation surgery.",
    "What are the best clinics for skin treatments in Gangnam?",
    "I'm looking for a hospital that offers hair transplant procedures.",
    "Can you help me find a clinic for laser eye surgery?",
    "I want to know about facelift surgery options in Korea.",
    "Are there any hospitals that provide liposuction services?",
    "I'm interested in getting a tummy tuck procedure.",
    "What's the recovery time for a nose job?",
    "Do you have information about Botox treatments?",
    "I need help finding a clinic for chin augmentation.",
    "What are the risks associated with breast surgery?",
    "I'm looking for a hospital with English-speaking staff.",
    "Can you recommend a clinic for eyelid surgery?",
    "I want to know about the best time to visit Korea for medical tourism.",
    "Do you offer packages for multiple procedures?",
    "I need information about post-surgery care.",
    "What documents do I need for medical visa?",
    "I'm interested in getting a consultation before traveling.",
];

const JA_TEMPLATES: [&str; 20] = [
    "ソウルで鼻形成手術を受けたいのですが、費用はどのくらいですか？",
    "インプラント専門の病院はありますか？",
    "豊胸手術の相談をしたいです。",
    "江南でスキンケア治療ができるクリニックはありますか？",
    "植毛手術を行っている病院を探しています。",
    "レーシック手術ができるクリニックを紹介してください。",
    "韓国でのフェイスリフト手術について知りたいです。",
    "脂肪吸引を提供している病院はありますか？",
    "腹部整形手術に興味があります。",
    "鼻形成手術の回復期間はどのくらいですか？",
    "ボトックス治療についての情報はありますか？",
    "あごの整形手術ができるクリニックを探しています。",
    "豊胸手術のリスクについて教えてください。",
    "英語を話せるスタッフがいる病院を探しています。",
    "二重まぶた手術をしてくれるクリニックを紹介してください。",
    "医療ツーリズムで韓国を訪れるのに最適な時期はいつですか？",
    "複数の手術をまとめて行うパッケージはありますか？",
    "術後のケアについて知りたいです。",
    "医療ビザに必要な書類は何ですか？",
    "渡航前に相談を受けたいです。",
];

const KO_TEMPLATES: [&str; 20] = [
    "서울에서 코 성형 수술을 받고 싶은데 비용이 얼마나 드나요?",
    "임플란트 전문 병원이 있나요?",
    "가슴 성형 수술 상담을 받고 싶습니다.",
    "강남에서 피부 관리 치료를 받을 수 있는 병원이 있나요?",
    "모발 이식 수술을 하는 병원을 찾고 있습니다.",
    "라식 수술을 할 수 있는 병원을 소개해 주세요.",
    "한국에서 리프팅 수술에 대해 알고 싶습니다.",
    "지방흡입을 제공하는 병원이 있나요?",
    "복부 성형 수술에 관심이 있습니다.",
    "코 성형 수술 회복 기간이 얼마나 걸리나요?",
    "보톡스 치료에 대한 정보가 있나요?",
    "턱 성형 수술을 하는 병원을 찾고 있습니다.",
    "가슴 수술의 위험성에 대해 알려주세요.",
    "영어를 할 수 있는 직원이 있는 병원을 찾고 있습니다.",
    "쌍꺼풀 수술을 해주는 병원을 소개해 주세요.",
    "의료 관광으로 한국을 방문하기에 가장 좋은 시기는 언제인가요?",
    "여러 수술을 함께 받을 수 있는 패키지가 있나요?",
    "수술 후 관리에 대해 알고 싶습니다.",
    "의료 비자에 필요한 서류는 무엇인가요?",
    "방문 전에 상담을 받고 싶습니다.",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_round_robin() {
        let inquiries = generate_inquiries(6, LIVE_SUFFIXES);
        let langs: Vec<_> = inquiries.iter().map(|i| i.language).collect();
        assert_eq!(
            langs,
            vec![
                Language::En,
                Language::Ja,
                Language::Ko,
                Language::En,
                Language::Ja,
                Language::Ko
            ]
        );
        assert_eq!(inquiries[0].id, 1);
        assert_eq!(inquiries[5].id, 6);
        assert_eq!(inquiries[0].text, EN_TEMPLATES[0]);
        // Index 3 takes suffix slot 3 % 4.
        assert_eq!(
            inquiries[3].text,
            format!("{} I need more information.", EN_TEMPLATES[1])
        );
    }

    #[test]
    fn test_suffix_rotation() {
        let inquiries = generate_inquiries(4, LIVE_SUFFIXES);
        assert_eq!(inquiries[1].text, JA_TEMPLATES[0]);
        assert_eq!(inquiries[2].text, format!("{} Please help me.", KO_TEMPLATES[0]));
        assert_eq!(
            inquiries[3].text,
            format!("{} I need more information.", EN_TEMPLATES[1])
        );

        let demo = generate_inquiries(3, DEMO_SUFFIXES);
        assert_eq!(demo[1].text, format!("{} Please help me.", JA_TEMPLATES[0]));
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(
            generate_inquiries(200, LIVE_SUFFIXES),
            generate_inquiries(200, LIVE_SUFFIXES)
        );
        assert_eq!(generate_inquiries(200, LIVE_SUFFIXES).len(), 200);
    }

    #[test]
    fn test_templates_wrap_after_sixty() {
        let inquiries = generate_inquiries(61, &[]);
        assert_eq!(inquiries[60].text, inquiries[0].text);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(Language::detect("ko"), Language::Ko);
        assert_eq!(Language::detect("KR"), Language::Ko);
        assert_eq!(Language::detect("Japanese"), Language::Ja);
        assert_eq!(Language::detect("jp"), Language::Ja);
        assert_eq!(Language::detect("en"), Language::En);
        assert_eq!(Language::detect(""), Language::En);
        // Plain substring sniff: any hint containing "ko" is Korean.
        assert_eq!(Language::detect("tokorozawa"), Language::Ko);
        assert_eq!(Language::detect("tokyo"), Language::En);
    }

    #[test]
    fn test_language_codes_roundtrip_through_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert!("fr".parse::<Language>().is_err());
    }
}
