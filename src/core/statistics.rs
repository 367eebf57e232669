// statistics module - document and writing session statistics
use std::time::{Duration, Instant};

use unicode_segmentation::UnicodeSegmentation;

pub const WORDS_PER_PAGE: usize = 250;
pub const READING_WORDS_PER_MINUTE: usize = 270;

/// Words longer than this count as long words for LIX.
const LONG_WORD_LETTERS: usize = 6;

/// Idle time before typing counts as paused.
pub const TYPING_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingEase {
    VeryEasy,
    Easy,
    Standard,
    Difficult,
    VeryDifficult,
}

impl ReadingEase {
    pub fn from_lix(lix: f64) -> Self {
        match lix {
            l if l < 25.0 => ReadingEase::VeryEasy,
            l if l < 35.0 => ReadingEase::Easy,
            l if l < 45.0 => ReadingEase::Standard,
            l if l < 55.0 => ReadingEase::Difficult,
            _ => ReadingEase::VeryDifficult,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadingEase::VeryEasy => "Very Easy",
            ReadingEase::Easy => "Easy",
            ReadingEase::Standard => "Standard",
            ReadingEase::Difficult => "Difficult",
            ReadingEase::VeryDifficult => "Very Difficult",
        }
    }
}

/// Human label for a Coleman-Liau grade.
pub fn grade_label(grade: i32) -> String {
    match grade {
        g if g <= 0 => "Kindergarten".to_string(),
        g if g <= 12 => g.to_string(),
        g if g <= 16 => "College".to_string(),
        _ => "Rocket Science".to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentStatistics {
    pub words: usize,
    pub characters: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub long_words: usize,
    letters: usize,
}

impl DocumentStatistics {
    /// Counts `text`, which is the whole document or just the selection.
    pub fn compute(text: &str) -> Self {
        // sentence segmentation underflows on empty input
        if text.is_empty() {
            return Self::default();
        }

        let mut words = 0;
        let mut long_words = 0;
        let mut letters = 0;
        for word in text.unicode_words() {
            let count = word.chars().filter(|c| c.is_alphanumeric()).count();
            words += 1;
            letters += count;
            if count > LONG_WORD_LETTERS {
                long_words += 1;
            }
        }

        let characters = text
            .graphemes(true)
            .filter(|g| *g != "\n" && *g != "\r\n")
            .count();

        let sentences = text
            .unicode_sentences()
            .filter(|s| s.unicode_words().next().is_some())
            .count();

        let paragraphs = text
            .split("\n\n")
            .filter(|p| p.unicode_words().next().is_some())
            .count();

        Self {
            words,
            characters,
            sentences,
            paragraphs,
            long_words,
            letters,
        }
    }

    pub fn pages(&self) -> usize {
        self.words.div_ceil(WORDS_PER_PAGE)
    }

    /// Share of long words, as a percentage.
    pub fn complex_words_percentage(&self) -> usize {
        if self.words == 0 {
            return 0;
        }
        self.long_words * 100 / self.words
    }

    pub fn reading_time(&self) -> Duration {
        let minutes = self.words.div_ceil(READING_WORDS_PER_MINUTE);
        Duration::from_secs(minutes as u64 * 60)
    }

    pub fn lix(&self) -> f64 {
        if self.words == 0 || self.sentences == 0 {
            return 0.0;
        }
        let words = self.words as f64;
        words / self.sentences as f64 + (self.long_words as f64 * 100.0) / words
    }

    pub fn reading_ease(&self) -> ReadingEase {
        ReadingEase::from_lix(self.lix())
    }

    /// Coleman-Liau index, rounded to a school grade.
    pub fn readability_grade(&self) -> i32 {
        if self.words == 0 {
            return 0;
        }
        let words = self.words as f64;
        let l = self.letters as f64 / words * 100.0;
        let s = self.sentences as f64 / words * 100.0;
        (0.0588 * l - 0.296 * s - 15.8).round() as i32
    }
}

/// Tracks writing progress since the window opened.
#[derive(Debug, Clone)]
pub struct SessionStatistics {
    started: Instant,
    baseline: Option<usize>,
    words_written: usize,
    idle: Duration,
    last_typing: Instant,
    paused_at: Option<Instant>,
}

impl SessionStatistics {
    pub fn new(now: Instant) -> Self {
        Self {
            started: now,
            baseline: None,
            words_written: 0,
            idle: Duration::ZERO,
            last_typing: now,
            paused_at: Some(now),
        }
    }

    /// Only growth counts; deleting words does not take them back.
    pub fn on_document_word_count(&mut self, words: usize) {
        if let Some(previous) = self.baseline {
            self.words_written += words.saturating_sub(previous);
        }
        self.baseline = Some(words);
    }

    /// Starts counting from `words` without crediting them, for a newly
    /// opened document.
    pub fn rebase(&mut self, words: usize) {
        self.baseline = Some(words);
    }

    pub fn typing(&mut self, now: Instant) {
        self.last_typing = now;
        self.typing_resumed(now);
    }

    /// Pauses once typing has stopped for [`TYPING_PAUSE`].
    pub fn tick(&mut self, now: Instant) {
        if self.paused_at.is_none() && now.duration_since(self.last_typing) >= TYPING_PAUSE {
            self.typing_paused(self.last_typing + TYPING_PAUSE);
        }
    }

    pub fn typing_paused(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            tracing::trace!("typing paused");
            self.paused_at = Some(now);
        }
    }

    pub fn typing_resumed(&mut self, now: Instant) {
        if let Some(paused) = self.paused_at.take() {
            tracing::trace!("typing resumed");
            self.idle += now.saturating_duration_since(paused);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn words_written(&self) -> usize {
        self.words_written
    }

    pub fn pages_written(&self) -> usize {
        self.words_written.div_ceil(WORDS_PER_PAGE)
    }

    pub fn writing_time(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }

    fn idle_time(&self, now: Instant) -> Duration {
        let pending = self
            .paused_at
            .map(|p| now.saturating_duration_since(p))
            .unwrap_or_default();
        self.idle + pending
    }

    pub fn idle_percentage(&self, now: Instant) -> usize {
        let total = self.writing_time(now).as_secs_f64();
        if total <= 0.0 {
            return 0;
        }
        (self.idle_time(now).as_secs_f64() / total * 100.0).round() as usize
    }

    /// Average over the time actually spent typing.
    pub fn words_per_minute(&self, now: Instant) -> usize {
        let active = self
            .writing_time(now)
            .saturating_sub(self.idle_time(now))
            .as_secs_f64()
            / 60.0;
        if active <= 0.0 {
            return 0;
        }
        (self.words_written as f64 / active).round() as usize
    }
}

/// Statistics offered by the status bar indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Words,
    Characters,
    Sentences,
    Paragraphs,
    Pages,
    WordsWritten,
    WordsPerMinute,
}

impl Statistic {
    pub const ALL: [Statistic; 7] = [
        Statistic::Words,
        Statistic::Characters,
        Statistic::Sentences,
        Statistic::Paragraphs,
        Statistic::Pages,
        Statistic::WordsWritten,
        Statistic::WordsPerMinute,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or(Statistic::Words)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn format(self, document: &DocumentStatistics, session: &SessionStatistics, now: Instant) -> String {
        match self {
            Statistic::Words => plural(document.words, "word"),
            Statistic::Characters => plural(document.characters, "character"),
            Statistic::Sentences => plural(document.sentences, "sentence"),
            Statistic::Paragraphs => plural(document.paragraphs, "paragraph"),
            Statistic::Pages => plural(document.pages(), "page"),
            Statistic::WordsWritten => format!("{} added", plural(session.words_written(), "word")),
            Statistic::WordsPerMinute => format!("{} wpm", session.words_per_minute(now)),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// `h:mm` for durations shown in the session tab.
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.as_secs() / 60;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_sentences_paragraphs() {
        let stats = DocumentStatistics::compute("One two three. Four five!\n\nSix.");
        assert_eq!(stats.words, 6);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.pages(), 1);
    }

    #[test]
    fn markup_is_not_counted_as_words() {
        let stats = DocumentStatistics::compute("# Title\n\n* **bold** item");
        assert_eq!(stats.words, 3);
    }

    #[test]
    fn characters_skip_line_breaks() {
        assert_eq!(DocumentStatistics::compute("héllo\n").characters, 5);
    }

    #[test]
    fn empty_text() {
        let stats = DocumentStatistics::compute("");
        assert_eq!(stats, DocumentStatistics::default());
        assert_eq!(stats.pages(), 0);
        assert_eq!(stats.lix(), 0.0);
        assert_eq!(stats.reading_time(), Duration::ZERO);
    }

    #[test]
    fn lix_and_complex_words() {
        let stats = DocumentStatistics::compute("The cat sat. Elephants wandered.");
        assert_eq!(stats.long_words, 2);
        assert_eq!(stats.complex_words_percentage(), 40);
        assert!((stats.lix() - 42.5).abs() < 1e-9);
        assert_eq!(stats.reading_ease(), ReadingEase::Standard);
    }

    #[test]
    fn grade_labels() {
        assert_eq!(grade_label(-3), "Kindergarten");
        assert_eq!(grade_label(8), "8");
        assert_eq!(grade_label(14), "College");
        assert_eq!(grade_label(20), "Rocket Science");
    }

    #[test]
    fn session_counts_only_growth() {
        let now = Instant::now();
        let mut session = SessionStatistics::new(now);
        session.on_document_word_count(100);
        session.on_document_word_count(110);
        session.on_document_word_count(105);
        session.on_document_word_count(108);
        assert_eq!(session.words_written(), 13);

        session.rebase(500);
        session.on_document_word_count(501);
        assert_eq!(session.words_written(), 14);
    }

    #[test]
    fn idle_time_and_wpm() {
        let start = Instant::now();
        let mut session = SessionStatistics::new(start);
        session.on_document_word_count(0);

        // idle for the first minute, then two minutes of typing
        session.typing(start + Duration::from_secs(60));
        session.on_document_word_count(60);
        session.typing(start + Duration::from_secs(180));

        let now = start + Duration::from_secs(180);
        assert_eq!(session.idle_percentage(now), 33);
        assert_eq!(session.words_per_minute(now), 30);
        assert_eq!(format_duration(session.writing_time(now)), "0:03");
    }

    #[test]
    fn tick_pauses_after_inactivity() {
        let start = Instant::now();
        let mut session = SessionStatistics::new(start);
        session.typing(start);
        session.tick(start + Duration::from_secs(1));
        assert!(!session.is_paused());

        session.tick(start + Duration::from_secs(30));
        assert!(session.is_paused());
        // idle counted from when the pause began
        assert_eq!(session.idle_percentage(start + Duration::from_secs(30)), 83);
    }

    #[test]
    fn status_bar_labels() {
        let now = Instant::now();
        let document = DocumentStatistics::compute("one");
        let session = SessionStatistics::new(now);
        assert_eq!(Statistic::Words.format(&document, &session, now), "1 word");
        assert_eq!(Statistic::Characters.format(&document, &session, now), "3 characters");
        assert_eq!(Statistic::WordsWritten.format(&document, &session, now), "0 words added");
        assert_eq!(Statistic::from_index(42), Statistic::Words);
    }
}
