pub mod history;
pub mod pipeline;

pub const CAMPUS_SYSTEM_PROMPT: &str = "You are a helpful assistant for Universiti Tunku Abdul Rahman (UTAR), Kampar, Perak, Malaysia. Your job is to answer questions about campus life, facilities, student services, courses, and general university information.\n\nRules:\n- Be polite, concise, and student-friendly.\n- Include local context (Kampar, Perak, Malaysia) when relevant.";

/// Starter questions offered by `/suggest`, mirroring the common things
/// students actually ask first.
pub const SUGGESTED_QUESTIONS: [&str; 8] = [
    "Where is the library located?",
    "How do I register for exams?",
    "What dining options are available?",
    "How can I join a student club?",
    "What are the housing options?",
    "How do I get a parking permit?",
    "How to connect to campus WiFi?",
    "Where is career services located?",
];
