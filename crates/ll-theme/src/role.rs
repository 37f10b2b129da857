// SPDX-License-Identifier: MIT
//
// Semantic roles, log severity levels, and icon identities.
//
// A role is a named purpose, never a color: the active theme decides what
// each one looks like. The set is closed so the attribute table can be a
// flat array indexed by discriminant.

// ─── Role ───────────────────────────────────────────────────────────────────

/// Every semantic styling purpose the renderer knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Role {
    /// No role: empty attributes.
    #[default]
    None,

    // ── Content ────────────────────────────────────────────────
    Text,
    Identifier,
    SearchMatch,
    Ok,
    Info,
    Error,
    Warning,
    AltRow,
    Hidden,
    CursorLine,
    DisabledCursorLine,
    AdjustedTime,
    SkewedTime,
    OffsetTime,
    TimeColumn,
    /// Derived gradient between the time column and the text body.
    TimeColumnToText,
    FileOffset,
    InvalidMsg,
    SelectedText,
    FuzzyMatch,
    Suggestion,

    // ── Status bars ────────────────────────────────────────────
    Status,
    WarnStatus,
    AlertStatus,
    ActiveStatus,
    ActiveStatus2,
    StatusTitle,
    StatusSubtitle,
    StatusInfo,
    StatusTitleHotkey,
    StatusDisabledTitle,
    StatusHotkey,
    InactiveStatus,
    InactiveAlertStatus,

    // ── Status-bar seams (derived, fg/bg swaps of the above) ───
    StatusStitchTitleToSub,
    StatusStitchSubToTitle,
    StatusStitchSubToNormal,
    StatusStitchNormalToSub,
    StatusStitchTitleToNormal,
    StatusStitchNormalToTitle,

    // ── Chrome ─────────────────────────────────────────────────
    Scrollbar,
    ScrollbarError,
    ScrollbarWarning,
    Focused,
    DisabledFocused,
    Popup,
    PopupBorder,
    ColorHint,
    Breadcrumb,

    // ── Syntax ─────────────────────────────────────────────────
    Keyword,
    String,
    Comment,
    DocDirective,
    Variable,
    Symbol,
    Number,
    Null,
    AsciiControl,
    NonAscii,
    ReSpecial,
    ReRepeat,
    File,
    Function,
    Type,
    Separator,

    // ── Documents ──────────────────────────────────────────────
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    ListGlyph,
    TableBorder,
    TableHeader,
    QuoteBorder,
    QuotedText,
    FootnoteBorder,
    FootnoteText,
    SnippetBorder,
    IndentGuide,
    QuotedCode,
    CodeBorder,
    InlineCode,

    // ── Diffs ──────────────────────────────────────────────────
    DiffDelete,
    DiffAdd,
    DiffSection,

    // ── Thresholds ─────────────────────────────────────────────
    LowThreshold,
    MedThreshold,
    HighThreshold,
}

impl Role {
    pub const COUNT: usize = Self::HighThreshold as usize + 1;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// All roles, in discriminant order.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        Self::ALL.iter().copied()
    }

    const ALL: [Self; Self::COUNT] = [
        Self::None,
        Self::Text,
        Self::Identifier,
        Self::SearchMatch,
        Self::Ok,
        Self::Info,
        Self::Error,
        Self::Warning,
        Self::AltRow,
        Self::Hidden,
        Self::CursorLine,
        Self::DisabledCursorLine,
        Self::AdjustedTime,
        Self::SkewedTime,
        Self::OffsetTime,
        Self::TimeColumn,
        Self::TimeColumnToText,
        Self::FileOffset,
        Self::InvalidMsg,
        Self::SelectedText,
        Self::FuzzyMatch,
        Self::Suggestion,
        Self::Status,
        Self::WarnStatus,
        Self::AlertStatus,
        Self::ActiveStatus,
        Self::ActiveStatus2,
        Self::StatusTitle,
        Self::StatusSubtitle,
        Self::StatusInfo,
        Self::StatusTitleHotkey,
        Self::StatusDisabledTitle,
        Self::StatusHotkey,
        Self::InactiveStatus,
        Self::InactiveAlertStatus,
        Self::StatusStitchTitleToSub,
        Self::StatusStitchSubToTitle,
        Self::StatusStitchSubToNormal,
        Self::StatusStitchNormalToSub,
        Self::StatusStitchTitleToNormal,
        Self::StatusStitchNormalToTitle,
        Self::Scrollbar,
        Self::ScrollbarError,
        Self::ScrollbarWarning,
        Self::Focused,
        Self::DisabledFocused,
        Self::Popup,
        Self::PopupBorder,
        Self::ColorHint,
        Self::Breadcrumb,
        Self::Keyword,
        Self::String,
        Self::Comment,
        Self::DocDirective,
        Self::Variable,
        Self::Symbol,
        Self::Number,
        Self::Null,
        Self::AsciiControl,
        Self::NonAscii,
        Self::ReSpecial,
        Self::ReRepeat,
        Self::File,
        Self::Function,
        Self::Type,
        Self::Separator,
        Self::H1,
        Self::H2,
        Self::H3,
        Self::H4,
        Self::H5,
        Self::H6,
        Self::ListGlyph,
        Self::TableBorder,
        Self::TableHeader,
        Self::QuoteBorder,
        Self::QuotedText,
        Self::FootnoteBorder,
        Self::FootnoteText,
        Self::SnippetBorder,
        Self::IndentGuide,
        Self::QuotedCode,
        Self::CodeBorder,
        Self::InlineCode,
        Self::DiffDelete,
        Self::DiffAdd,
        Self::DiffSection,
        Self::LowThreshold,
        Self::MedThreshold,
        Self::HighThreshold,
    ];
}

// ─── Level ──────────────────────────────────────────────────────────────────

/// Log message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Level {
    /// Messages whose severity could not be parsed; styled like `Info`.
    #[default]
    Unknown,
    Trace,
    Debug,
    Info,
    Stats,
    Notice,
    Warning,
    Error,
    Critical,
    Fatal,
}

impl Level {
    pub const COUNT: usize = Self::Fatal as usize + 1;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Unknown,
            Self::Trace,
            Self::Debug,
            Self::Info,
            Self::Stats,
            Self::Notice,
            Self::Warning,
            Self::Error,
            Self::Critical,
            Self::Fatal,
        ]
        .into_iter()
    }
}

// ─── Icons ──────────────────────────────────────────────────────────────────

/// Named icon slots a theme may provide glyphs for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IconId {
    Hidden,
    Ok,
    Info,
    Warning,
    Error,
    LevelTrace,
    LevelDebug,
    LevelInfo,
    LevelStats,
    LevelNotice,
    LevelWarning,
    LevelError,
    LevelCritical,
    LevelFatal,
    Play,
    Stop,
}

impl IconId {
    pub const COUNT: usize = Self::Stop as usize + 1;

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Hidden,
            Self::Ok,
            Self::Info,
            Self::Warning,
            Self::Error,
            Self::LevelTrace,
            Self::LevelDebug,
            Self::LevelInfo,
            Self::LevelStats,
            Self::LevelNotice,
            Self::LevelWarning,
            Self::LevelError,
            Self::LevelCritical,
            Self::LevelFatal,
            Self::Play,
            Self::Stop,
        ]
        .into_iter()
    }

    /// The role whose colors paint this icon.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Hidden => Role::Hidden,
            Self::Ok | Self::Play => Role::Ok,
            Self::Info | Self::LevelInfo | Self::LevelStats | Self::LevelNotice => Role::Info,
            Self::Warning | Self::LevelWarning => Role::Warning,
            Self::Error | Self::LevelError | Self::LevelCritical | Self::LevelFatal | Self::Stop => {
                Role::Error
            }
            Self::LevelTrace | Self::LevelDebug => Role::Comment,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
