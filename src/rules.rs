//! Keyword-matched canned answers for common campus questions.
//!
//! Rules are scanned in declaration order and the first matching answer wins,
//! so broader keywords must come after the more specific rules that overlap
//! with them.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// Matches when any listed keyword occurs in the input.
    AnyOf(&'static [&'static str]),
    /// Matches only when every listed keyword occurs in the input.
    AllOf(&'static [&'static str]),
}

impl Predicate {
    fn matches(&self, normalized: &str) -> bool {
        match self {
            Self::AnyOf(keywords) => keywords.iter().any(|kw| normalized.contains(kw)),
            Self::AllOf(keywords) => keywords.iter().all(|kw| normalized.contains(kw)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    predicate: Predicate,
    answer: &'static str,
}

impl Rule {
    pub const fn new(predicate: Predicate, answer: &'static str) -> Self {
        Self { predicate, answer }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The built-in UTAR Kampar campus rules, in priority order.
    pub fn campus_defaults() -> Self {
        Self::new(CAMPUS_RULES.to_vec())
    }

    /// Returns the first answer whose predicate matches, lower-casing the
    /// input so matching is case-insensitive. Empty input matches nothing.
    pub fn match_input(&self, input: &str) -> Option<&'static str> {
        let normalized = input.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&normalized))
            .map(|rule| rule.answer)
    }
}

const CAMPUS_RULES: [Rule; 10] = [
    Rule::new(
        Predicate::AnyOf(&["library"]),
        "The main library is at Block G. Open 8 AM\u{2013}9 PM weekdays, 8 AM\u{2013}5 PM weekends.",
    ),
    // "register" alone is too ambiguous (course registration, club sign-up).
    Rule::new(
        Predicate::AllOf(&["register", "exam"]),
        "You can register for exams through the student portal under 'Exam Registration'. Register before the deadline to avoid late fees.",
    ),
    Rule::new(
        Predicate::AnyOf(&["dining", "food"]),
        "Campus dining includes the main cafeteria, food court, coffee shop in the library, and several snack kiosks.",
    ),
    Rule::new(
        Predicate::AnyOf(&["student club", "join club"]),
        "Visit the Student Activities Office or attend the Club Fair during orientation. You can also join clubs via the campus app.",
    ),
    Rule::new(
        Predicate::AnyOf(&["housing", "dorm"]),
        "Housing applications are online in the student portal. The deadline for next semester is Nov 15. First-year students are guaranteed housing.",
    ),
    Rule::new(
        Predicate::AnyOf(&["parking"]),
        "Student parking permits are available at Campus Security. Bring your vehicle registration and student ID. Cost: RM150 per semester.",
    ),
    Rule::new(
        Predicate::AnyOf(&["wifi"]),
        "Campus WiFi is everywhere. Connect to 'Campus-Net' with your student credentials. For issues, contact IT Help Desk.",
    ),
    Rule::new(
        Predicate::AnyOf(&["career"]),
        "Career Services (2nd floor, Student Success Center) offers resume reviews, mock interviews, and counseling.",
    ),
    Rule::new(
        Predicate::AnyOf(&["transcript"]),
        "Official transcripts are requested at the Registrar's Office (small fee). Unofficial ones are free on the student portal.",
    ),
    Rule::new(
        Predicate::AnyOf(&["tuition", "payment"]),
        "Tuition is paid online in the portal under 'Finances' > 'Make a Payment'. Payment plans are available.",
    ),
];
