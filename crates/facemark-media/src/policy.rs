//! Policy engine: maps a face's attributes to annotation decisions.
//!
//! Every workflow is a named [`WorkflowPolicy`]. The workflows deliberately
//! differ in palette, minor test and empty-emotion text; those differences are
//! kept as configuration rather than merged.
//!
//! | Policy | Minor test | Minor color | No emotions | Blurs minors |
//! |--------|------------|-------------|-------------|--------------|
//! | `OUTLINE` | [`is_under_18`] | yellow | `""` | no |
//! | `LABELING` | [`is_minor_by_upper_bound`] | blue | `"No emotion data"` | yes |

use facemark_models::{Color, Emotion, FaceEntry, PixelRect};

use crate::instruction::{Anchor, BlurKind, DrawInstruction};

// =============================================================================
// Constants
// =============================================================================

/// Age below which a face counts as a minor.
pub const MINOR_AGE: i64 = 18;

/// Number of emotions rendered in a label.
pub const TOP_EMOTIONS: usize = 2;

/// Outline thickness in pixels.
pub const OUTLINE_THICKNESS: u32 = 2;

/// Color of boxes rendered from stored labels.
pub const STORED_LABEL_COLOR: Color = Color::GREEN;

// =============================================================================
// Minor predicates
// =============================================================================

/// Lower age bound under 18; an unknown bound counts as 0.
///
/// Used by the under-18 redaction filter and the outline workflow.
pub fn is_under_18(entry: &FaceEntry) -> bool {
    entry.age_low() < MINOR_AGE
}

/// Age range present and its upper bound under 18; an unknown upper bound
/// counts as 100.
///
/// Used by the labeling workflow. A face aged 16-19 is under 18 by
/// [`is_under_18`] but not a minor here.
pub fn is_minor_by_upper_bound(entry: &FaceEntry) -> bool {
    entry.age_range.is_some() && entry.age_high() < MINOR_AGE
}

/// Which minor test a workflow applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinorPredicate {
    LowerBound,
    UpperBound,
}

impl MinorPredicate {
    pub fn test(&self, entry: &FaceEntry) -> bool {
        match self {
            MinorPredicate::LowerBound => is_under_18(entry),
            MinorPredicate::UpperBound => is_minor_by_upper_bound(entry),
        }
    }
}

// =============================================================================
// Workflow policies
// =============================================================================

/// Outline colors, in rule order: minor, male, female, anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub minor: Color,
    pub male: Color,
    pub female: Color,
    pub unknown: Color,
}

impl Palette {
    pub const OUTLINE: Palette = Palette {
        minor: Color::YELLOW,
        male: Color::RED,
        female: Color::GREEN,
        unknown: Color::WHITE,
    };

    pub const LABELING: Palette = Palette {
        minor: Color::BLUE,
        male: Color::RED,
        female: Color::GREEN,
        unknown: Color::WHITE,
    };
}

/// Per-workflow annotation configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkflowPolicy {
    pub name: &'static str,
    pub palette: Palette,
    pub minor: MinorPredicate,
    pub empty_emotion_text: &'static str,
    pub blur_minors: bool,
    pub thickness: u32,
}

impl WorkflowPolicy {
    /// Square-face workflow.
    pub const OUTLINE: WorkflowPolicy = WorkflowPolicy {
        name: "outline",
        palette: Palette::OUTLINE,
        minor: MinorPredicate::LowerBound,
        empty_emotion_text: "",
        blur_minors: false,
        thickness: OUTLINE_THICKNESS,
    };

    /// Apply-labels workflow.
    pub const LABELING: WorkflowPolicy = WorkflowPolicy {
        name: "labeling",
        palette: Palette::LABELING,
        minor: MinorPredicate::UpperBound,
        empty_emotion_text: "No emotion data",
        blur_minors: true,
        thickness: OUTLINE_THICKNESS,
    };

    /// Outline color. First matching rule wins: minor, "Male", "Female", other.
    pub fn color_for(&self, entry: &FaceEntry) -> Color {
        if self.minor.test(entry) {
            return self.palette.minor;
        }
        match entry.gender_value() {
            Some("Male") => self.palette.male,
            Some("Female") => self.palette.female,
            _ => self.palette.unknown,
        }
    }

    /// Emotion label, or this workflow's placeholder when there are none.
    pub fn emotion_text(&self, entry: &FaceEntry) -> String {
        if entry.emotions.is_empty() {
            self.empty_emotion_text.to_string()
        } else {
            emotion_summary(&entry.emotions, TOP_EMOTIONS)
        }
    }

    /// Pure decision for one resolved face.
    pub fn decide(&self, entry: &FaceEntry, rect: &PixelRect) -> AnnotationDecision {
        AnnotationDecision {
            color: self.color_for(entry),
            should_blur: self.blur_minors && self.minor.test(entry),
            label_text: self.emotion_text(entry),
            label_anchor: label_anchor(rect),
        }
    }
}

/// What to do with one face.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDecision {
    pub color: Color,
    pub should_blur: bool,
    pub label_text: String,
    pub label_anchor: Anchor,
}

// =============================================================================
// Labels
// =============================================================================

/// Top `k` emotions by confidence, highest first, formatted as
/// `"TYPE (NN.N%)"` and joined with `", "`. Ties keep input order.
pub fn emotion_summary(emotions: &[Emotion], k: usize) -> String {
    let mut sorted: Vec<&Emotion> = emotions.iter().collect();
    // sort_by is stable
    sorted.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    sorted
        .into_iter()
        .take(k)
        .map(|e| format!("{} ({:.1}%)", e.kind, e.confidence))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Above the box when there is room, otherwise below it.
pub fn label_anchor(rect: &PixelRect) -> Anchor {
    if rect.y > 20 {
        Anchor::new(rect.x, rect.y.saturating_sub(10))
    } else {
        Anchor::new(rect.x, rect.bottom().saturating_add(20))
    }
}

/// Anchor for a second label stacked over the first.
pub fn secondary_label_anchor(rect: &PixelRect) -> Anchor {
    if rect.y > 40 {
        Anchor::new(rect.x, rect.y.saturating_sub(30))
    } else {
        Anchor::new(rect.x, rect.bottom().saturating_add(40))
    }
}

// =============================================================================
// Redaction
// =============================================================================

/// Which faces a redaction workflow blurs.
#[derive(Clone, Copy)]
pub enum BlurFilter {
    /// No filter: blur every face
    All,
    /// Faces matching [`is_under_18`]
    Under18,
    /// Caller-supplied predicate
    Predicate(fn(&FaceEntry) -> bool),
}

impl std::fmt::Debug for BlurFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlurFilter::All => write!(f, "All"),
            BlurFilter::Under18 => write!(f, "Under18"),
            BlurFilter::Predicate(_) => write!(f, "Predicate(..)"),
        }
    }
}

impl BlurFilter {
    pub fn matches(&self, entry: &FaceEntry) -> bool {
        match self {
            BlurFilter::All => true,
            BlurFilter::Under18 => is_under_18(entry),
            BlurFilter::Predicate(predicate) => predicate(entry),
        }
    }
}

// =============================================================================
// Instruction builders
// =============================================================================

/// Blur the face when the filter matches.
pub fn redaction_instructions(
    entry: &FaceEntry,
    rect: PixelRect,
    filter: BlurFilter,
) -> Vec<DrawInstruction> {
    if filter.matches(entry) {
        vec![DrawInstruction::Blur {
            rect,
            kind: BlurKind::REDACTION,
        }]
    } else {
        Vec::new()
    }
}

/// Colored outline plus the emotion label (omitted when empty).
pub fn outline_instructions(entry: &FaceEntry, rect: PixelRect) -> Vec<DrawInstruction> {
    let policy = WorkflowPolicy::OUTLINE;
    let decision = policy.decide(entry, &rect);

    let mut out = vec![DrawInstruction::Rectangle {
        rect,
        color: decision.color,
        thickness: policy.thickness,
    }];
    if !decision.label_text.is_empty() {
        out.push(DrawInstruction::Text {
            text: decision.label_text,
            anchor: decision.label_anchor,
            color: decision.color,
        });
    }
    out
}

/// Blur for minors, outline, name label and emotion label.
pub fn labeling_instructions(
    entry: &FaceEntry,
    rect: PixelRect,
    name: &str,
) -> Vec<DrawInstruction> {
    let policy = WorkflowPolicy::LABELING;
    let decision = policy.decide(entry, &rect);

    let mut out = Vec::with_capacity(4);
    if decision.should_blur {
        out.push(DrawInstruction::Blur {
            rect,
            kind: BlurKind::REDACTION,
        });
    }
    out.push(DrawInstruction::Rectangle {
        rect,
        color: decision.color,
        thickness: policy.thickness,
    });
    out.push(DrawInstruction::Text {
        text: name.to_string(),
        anchor: decision.label_anchor,
        color: decision.color,
    });
    out.push(DrawInstruction::Text {
        text: decision.label_text,
        anchor: secondary_label_anchor(&rect),
        color: decision.color,
    });
    out
}

/// Box and name for a stored label.
pub fn stored_label_instructions(rect: PixelRect, name: &str) -> Vec<DrawInstruction> {
    vec![
        DrawInstruction::Rectangle {
            rect,
            color: STORED_LABEL_COLOR,
            thickness: OUTLINE_THICKNESS,
        },
        DrawInstruction::Text {
            text: name.to_string(),
            anchor: label_anchor(&rect),
            color: STORED_LABEL_COLOR,
        },
    ]
}

/// Options for marking detector output (no attributes available).
#[derive(Debug, Clone, PartialEq)]
pub struct MarkOptions {
    pub color: Color,
    pub blur: bool,
    pub caption: Option<String>,
}

impl Default for MarkOptions {
    fn default() -> Self {
        Self {
            color: Color::BLUE,
            blur: false,
            caption: None,
        }
    }
}

/// Outline, then optional median blur, then optional caption.
pub fn mark_instructions(rect: PixelRect, options: &MarkOptions) -> Vec<DrawInstruction> {
    let mut out = vec![DrawInstruction::Rectangle {
        rect,
        color: options.color,
        thickness: OUTLINE_THICKNESS,
    }];
    if options.blur {
        out.push(DrawInstruction::Blur {
            rect,
            kind: BlurKind::CASCADE,
        });
    }
    if let Some(caption) = options.caption.as_deref().filter(|c| !c.is_empty()) {
        out.push(DrawInstruction::Text {
            text: caption.to_string(),
            anchor: label_anchor(&rect),
            color: options.color,
        });
    }
    out
}
