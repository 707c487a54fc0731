//! Rule tables that turn attribute codes into feedback sentences.
//!
//! Every function here is a pure lookup over static tables.

use crate::types::{AttributeCode, AttributeCodes, Level};

/// Optional constraint on each token of one attribute code.
#[derive(Debug, Clone, Copy)]
struct TokenPattern {
    first: Option<Level>,
    second: Option<Level>,
}

impl TokenPattern {
    const ANY: Self = Self {
        first: None,
        second: None,
    };

    const fn first(level: Level) -> Self {
        Self {
            first: Some(level),
            second: None,
        }
    }

    const fn exact(first: Level, second: Level) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    fn matches(self, code: AttributeCode) -> bool {
        self.first.map_or(true, |level| code.first == level)
            && self.second.map_or(true, |level| code.second == level)
    }
}

#[derive(Debug, Clone, Copy)]
struct CodesPattern {
    vocal_cord: TokenPattern,
    contact: TokenPattern,
    larynx: TokenPattern,
    strength: TokenPattern,
}

impl CodesPattern {
    const ANY: Self = Self {
        vocal_cord: TokenPattern::ANY,
        contact: TokenPattern::ANY,
        larynx: TokenPattern::ANY,
        strength: TokenPattern::ANY,
    };

    fn matches(&self, codes: &AttributeCodes) -> bool {
        self.vocal_cord.matches(codes.vocal_cord)
            && self.contact.matches(codes.contact)
            && self.larynx.matches(codes.larynx)
            && self.strength.matches(codes.strength)
    }
}

use crate::types::Level::{High as H, Low as L, Mid as M};

const SEGMENT_RULES: &[(CodesPattern, &str)] = &[
    (
        CodesPattern {
            vocal_cord: TokenPattern::exact(M, L),
            contact: TokenPattern::first(H),
            ..CodesPattern::ANY
        },
        "성대가 중간 정도 두께로 진동하며, 접촉률이 높고, 후두 위치는 중간, 발성 강도는 중간 수준입니다.",
    ),
    (
        CodesPattern {
            vocal_cord: TokenPattern::exact(M, H),
            larynx: TokenPattern::exact(M, H),
            ..CodesPattern::ANY
        },
        "고음에서 성대 진동이 좋으나, 성대 접촉이 약하고 후두 위치가 높습니다.",
    ),
    (
        CodesPattern {
            larynx: TokenPattern::exact(H, L),
            ..CodesPattern::ANY
        },
        "후두의 급격한 변화가 관찰됩니다. 더 안정적인 발성이 필요합니다.",
    ),
    (
        CodesPattern {
            vocal_cord: TokenPattern::first(H),
            ..CodesPattern::ANY
        },
        "성대가 두껍게 진동하고 있습니다. 더 가볍게 발성해 보세요.",
    ),
    (
        CodesPattern {
            contact: TokenPattern::first(L),
            ..CodesPattern::ANY
        },
        "성대 접촉이 약합니다. 더 명확한 발성이 필요합니다.",
    ),
    (
        CodesPattern {
            strength: TokenPattern::first(H),
            ..CodesPattern::ANY
        },
        "발성 강도가 강합니다. 좀 더 부드럽게 발성해 보세요.",
    ),
];

/// Clause tables in severity order (`L_L` first, `H_H` last).
type ClauseTable = [&'static str; 9];

const VOCAL_CORD_CLAUSES: ClauseTable = [
    "성대가 매우 얇게 진동합니다.",
    "성대가 얇게 진동합니다.",
    "성대가 얇지만 강하게 진동합니다.",
    "성대가 적절한 두께로 진동하나 약간 부족합니다.",
    "성대가 적절한 두께로 진동합니다.",
    "성대가 적절한 두께로 강하게 진동합니다.",
    "성대가 두껍게 진동하나 약간 약합니다.",
    "성대가 두껍게 진동합니다.",
    "성대가 매우 두껍고 강하게 진동합니다.",
];

const CONTACT_CLAUSES: ClauseTable = [
    "성대 접촉이 매우 약합니다.",
    "성대 접촉이 약합니다.",
    "성대 접촉이 약하지만 긴장되어 있습니다.",
    "성대 접촉이 적절하나 약간 부족합니다.",
    "성대 접촉이 적절합니다.",
    "성대 접촉이 적절하나 약간 긴장되어 있습니다.",
    "성대 접촉이 강하나 약간 느슨합니다.",
    "성대 접촉이 강합니다.",
    "성대 접촉이 매우 강하고 긴장되어 있습니다.",
];

const LARYNX_CLAUSES: ClauseTable = [
    "후두 위치가 매우 낮습니다.",
    "후두 위치가 낮습니다.",
    "후두 위치가 낮고 긴장되어 있습니다.",
    "후두 위치가 적절하나 약간 낮습니다.",
    "후두 위치가 적절합니다.",
    "후두 위치가 적절하나 약간 높습니다.",
    "후두 위치가 높으나 약간 이완되어 있습니다.",
    "후두 위치가 높습니다.",
    "후두 위치가 매우 높고 긴장되어 있습니다.",
];

const STRENGTH_CLAUSES: ClauseTable = [
    "발성 강도가 매우 약합니다.",
    "발성 강도가 약합니다.",
    "발성 강도가 약하지만 힘이 들어갑니다.",
    "발성 강도가 적절하나 약간 부족합니다.",
    "발성 강도가 적절합니다.",
    "발성 강도가 적절하나 약간 강합니다.",
    "발성 강도가 강하나 약간 부족한 느낌입니다.",
    "발성 강도가 강합니다.",
    "발성 강도가 매우 강하고 긴장되어 있습니다.",
];

const BAND_ADVICE: &[(&str, &str)] = &[
    (
        "매우 낮은 음역",
        "이 매우 낮은 음역대에서는 성대를 충분히 두껍게 유지하며 편안하게 발성하는 것이 중요합니다.",
    ),
    (
        "낮은 음역",
        "이 낮은 음역대에서는 성대 접촉을 적절히 유지하면서 후두를 이완시키는 것이 도움이 됩니다.",
    ),
    (
        "중하 음역",
        "이 중하 음역대는 대화에서 자주 사용되는 범위로, 자연스럽고 편안한 발성을 유지하세요.",
    ),
    (
        "중간 음역",
        "이 중간 음역대에서는 균형 잡힌 발성이 중요하며, 과도한 힘을 빼고 자연스럽게 발성하세요.",
    ),
    (
        "중상 음역",
        "이 중상 음역대에서는 성대가 너무 얇아지지 않도록 하면서 후두 긴장을 조절하세요.",
    ),
    (
        "높은 음역",
        "이 높은 음역대에서는 후두가 과도하게 상승하지 않도록 주의하면서 성대 접촉을 유지하세요.",
    ),
    (
        "매우 높은 음역",
        "이 매우 높은 음역대에서는 후두 긴장을 최소화하고 가벼운 발성을 유지하는 것이 중요합니다.",
    ),
];

/// Condition for one clause of the overall summary.
#[derive(Debug, Clone, Copy)]
enum Condition {
    Codes(CodesPattern),
    /// Vocal-cord sustain differs from onset and equals the given level.
    VocalCordShiftsTo(Level),
    /// Both vocal cord and larynx carry an `H` token.
    VocalCordAndLarynxHigh,
}

impl Condition {
    fn holds(&self, codes: &AttributeCodes) -> bool {
        match self {
            Condition::Codes(pattern) => pattern.matches(codes),
            Condition::VocalCordShiftsTo(level) => {
                codes.vocal_cord.second != codes.vocal_cord.first
                    && codes.vocal_cord.second == *level
            }
            Condition::VocalCordAndLarynxHigh => {
                codes.vocal_cord.contains(H) && codes.larynx.contains(H)
            }
        }
    }
}

const fn vocal_cord_onset(level: Level) -> Condition {
    Condition::Codes(CodesPattern {
        vocal_cord: TokenPattern::first(level),
        ..CodesPattern::ANY
    })
}

const fn contact_onset(level: Level) -> Condition {
    Condition::Codes(CodesPattern {
        contact: TokenPattern::first(level),
        ..CodesPattern::ANY
    })
}

const fn larynx(pattern: TokenPattern) -> Condition {
    Condition::Codes(CodesPattern {
        larynx: pattern,
        ..CodesPattern::ANY
    })
}

const fn strength_onset(level: Level) -> Condition {
    Condition::Codes(CodesPattern {
        strength: TokenPattern::first(level),
        ..CodesPattern::ANY
    })
}

/// Summary clauses; within a group only the first holding clause is used.
const OVERALL_GROUPS: &[&[(Condition, &str)]] = &[
    &[
        (
            vocal_cord_onset(L),
            "낮은 음에서 성대를 필요보다 두껍게 진동시킵니다. 좀 더 가볍게 발성할 필요가 있습니다. ",
        ),
        (
            vocal_cord_onset(H),
            "낮은 음에서 성대를 필요보다 가볍게 진동시킵니다. 좀 더 안정적인 발성이 필요합니다. ",
        ),
    ],
    &[
        (
            Condition::VocalCordShiftsTo(H),
            "높은 음에서 성대가 가볍게 진동하는 느낌은 좋으나, ",
        ),
        (
            Condition::VocalCordShiftsTo(L),
            "높은 음에서 성대가 무겁게 진동하는 경향이 있습니다. ",
        ),
    ],
    &[
        (
            contact_onset(L),
            "성대 접촉률이 낮아 소리가 흐릴 수 있습니다. ",
        ),
        (
            contact_onset(H),
            "성대 접촉률이 높아 소리가 긴장될 수 있습니다. ",
        ),
    ],
    &[
        (
            larynx(TokenPattern::exact(H, L)),
            "후두의 상승으로 톤의 변화가 급격하게 발생하기도 합니다. ",
        ),
        (
            larynx(TokenPattern::first(H)),
            "후두 위치가 전반적으로 높은 편입니다. ",
        ),
        (
            larynx(TokenPattern::first(L)),
            "후두 위치가 전반적으로 낮은 편입니다. ",
        ),
    ],
    &[
        (
            strength_onset(L),
            "발성 강도가 전반적으로 약한 편입니다. ",
        ),
        (
            strength_onset(H),
            "발성 강도가 전반적으로 강한 편입니다. ",
        ),
    ],
    &[(
        Condition::VocalCordAndLarynxHigh,
        "또한 부분적으로 필요보다 좀 더 가볍게 진동하는 경향도 보입니다. ",
    )],
];

/// Short feedback for one consolidated span: first matching rule, else the raw codes.
pub fn segment_feedback(codes: &AttributeCodes) -> String {
    SEGMENT_RULES
        .iter()
        .find(|(pattern, _)| pattern.matches(codes))
        .map(|(_, text)| (*text).to_string())
        .unwrap_or_else(|| {
            format!(
                "성대 진동: {}, 접촉: {}, 후두 위치: {}, 발성 강도: {}",
                codes.vocal_cord, codes.contact, codes.larynx, codes.strength
            )
        })
}

/// Band intro, one clause per attribute, then the band's advice when known.
pub fn pitch_band_feedback(band_name: &str, codes: &AttributeCodes) -> String {
    let clauses = [
        describe(&VOCAL_CORD_CLAUSES, codes.vocal_cord),
        describe(&CONTACT_CLAUSES, codes.contact),
        describe(&LARYNX_CLAUSES, codes.larynx),
        describe(&STRENGTH_CLAUSES, codes.strength),
    ];
    let mut feedback = format!("{band_name}에서는 ");
    feedback.push_str(&clauses.into_iter().flatten().collect::<Vec<_>>().join(" "));
    if let Some(advice) = band_advice(band_name) {
        feedback.push(' ');
        feedback.push_str(advice);
    }
    feedback
}

/// Whole-recording summary built from one set of codes.
pub fn overall_feedback(codes: &AttributeCodes) -> String {
    let mut feedback = String::new();
    for group in OVERALL_GROUPS {
        if let Some((_, text)) = group.iter().find(|(condition, _)| condition.holds(codes)) {
            feedback.push_str(text);
        }
    }
    feedback.trim().to_string()
}

pub fn band_advice(band_name: &str) -> Option<&'static str> {
    BAND_ADVICE
        .iter()
        .find(|(name, _)| *name == band_name)
        .map(|(_, advice)| *advice)
}

fn describe(table: &ClauseTable, code: AttributeCode) -> Option<&'static str> {
    table.get(usize::from(code.severity()).checked_sub(1)?).copied()
}
