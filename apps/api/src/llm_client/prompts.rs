// Shared system prompts. Feature-specific prompt builders live next to the
// feature that uses them.

/// System prompt for resume suggestions.
pub const RESUME_WRITER_SYSTEM: &str =
    "You are a professional resume writer specializing in healthcare careers.";

/// System prompt for per-item resume enhancement.
pub const RESUME_ENHANCER_SYSTEM: &str = "You are a professional resume writer specializing in \
    healthcare careers. Write concise, impactful content.";
