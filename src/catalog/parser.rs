//! Question package parser.
//!
//! Turns the line-oriented package format into a [`Game`]. Parsing is a fold
//! over scanned lines: an accumulator carries the section cursor and the
//! partially built game, and each line produces the next accumulator.
//!
//! Recognized headers (matched at the start of a line):
//!
//! | Header | Effect |
//! |---|---|
//! | `Чемпионат:` | open the game title |
//! | `Тур:` | finalize the previous tournament, open a new one |
//! | `Вопрос <N>:` | open the next question of the current tournament |
//! | `Ответ:` | switch to the current question's answer |
//! | `Комментарий:` | switch to the current question's comment |
//!
//! A blank line closes the current field; text after it is dropped until the
//! next header. A `Чемпионат:` header always starts the game over: tours
//! parsed before it are discarded. Image directives `(pic: name.jpg)` are
//! replaced by `<img>` markup before anything else looks at the line; a
//! directive that cannot be read (unclosed, empty name) loses its `(pic:`
//! marker and is reported.
//!
//! The parser never fails. Structural defects are reported as
//! [`ParseDiagnostic`]s and leave the affected entries incomplete.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::model::{Game, Question, Tournament};
use super::scanner::{Line, scan};

/// Image host used when no base URL is configured.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://db.chgk.info/images/db";

const CHAMPIONSHIP_HEADER: &str = "Чемпионат:";
const TOUR_HEADER: &str = "Тур:";
const ANSWER_HEADER: &str = "Ответ:";
const COMMENT_HEADER: &str = "Комментарий:";

static QUESTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Вопрос\s+\d+\s*:").expect("valid regex"));

static IMAGE_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(pic:\s*([^)\s][^)]*?)\s*\)").expect("valid regex"));

const IMAGE_MARKER: &str = "(pic:";

/// Field that subsequent content lines are appended to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// No open field; content lines are dropped
    #[default]
    None,
    /// `Game::title`
    GameTitle,
    /// `Tournament::title` of the last tournament
    TournamentTitle,
    /// `Question::question` of the last question
    Question,
    /// `Question::answer` of the last question
    Answer,
    /// `Question::comment` of the last question
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Header {
    Championship,
    Tour,
    Question,
    Answer,
    Comment,
}

impl Header {
    /// Recognizes a header at the start of `text`, returning the header and
    /// whatever follows it on the same line.
    fn detect(text: &str) -> Option<(Self, &str)> {
        let literal = [
            (CHAMPIONSHIP_HEADER, Self::Championship),
            (TOUR_HEADER, Self::Tour),
            (ANSWER_HEADER, Self::Answer),
            (COMMENT_HEADER, Self::Comment),
        ];
        for (marker, header) in literal {
            if let Some(rest) = text.strip_prefix(marker) {
                return Some((header, rest.trim()));
            }
        }
        QUESTION_HEADER_RE
            .find(text)
            .map(|m| (Self::Question, text[m.end()..].trim()))
    }
}

/// Structural defect found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// `Вопрос N:` before any `Тур:` header
    QuestionOutsideTournament,
    /// `Ответ:` or `Комментарий:` with no open question in the current tournament
    OrphanSection {
        /// The header that had nothing to attach to
        header: &'static str,
    },
    /// A later `Чемпионат:` header restarted the game
    RepeatedChampionship {
        /// Tours parsed before the header and dropped with it
        discarded: usize,
    },
    /// `(pic:` without a closing parenthesis or file name
    MalformedImageDirective,
    /// The package never provided a championship title
    MissingGameTitle,
    /// Tournament without a title (1-based tournament position)
    MissingTournamentTitle {
        /// Tournament position
        tournament: usize,
    },
    /// Tournament without questions (1-based tournament position)
    EmptyTournament {
        /// Tournament position
        tournament: usize,
    },
    /// Question with an empty answer
    MissingAnswer {
        /// Tournament position
        tournament: usize,
        /// Question index
        question: usize,
    },
}

/// A parse defect with the source line it was detected on, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// 1-based source line, `None` for defects found when finishing
    pub line: Option<usize>,
    /// What went wrong
    pub kind: DiagnosticKind,
}

impl std::fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiagnosticKind::QuestionOutsideTournament => {
                write!(f, "question header before any tour header")?;
            }
            DiagnosticKind::OrphanSection { header } => {
                write!(f, "'{header}' without a question to attach to")?;
            }
            DiagnosticKind::RepeatedChampionship { discarded } => {
                write!(f, "championship header restarts the game, {discarded} tour(s) dropped")?;
            }
            DiagnosticKind::MalformedImageDirective => {
                write!(f, "unreadable image directive removed")?;
            }
            DiagnosticKind::MissingGameTitle => write!(f, "missing championship title")?,
            DiagnosticKind::MissingTournamentTitle { tournament } => {
                write!(f, "tour {tournament} has no title")?;
            }
            DiagnosticKind::EmptyTournament { tournament } => {
                write!(f, "tour {tournament} has no questions")?;
            }
            DiagnosticKind::MissingAnswer {
                tournament,
                question,
            } => write!(f, "tour {tournament} question {question} has no answer")?,
        }
        if let Some(line) = self.line {
            write!(f, " (line {line})")?;
        }
        Ok(())
    }
}

/// Parsed game plus the defects found along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    /// The parsed (possibly incomplete) game
    pub game: Game,
    /// Structural defects, in discovery order
    pub diagnostics: Vec<ParseDiagnostic>,
}

/// Package parser configured with the image host used for directive markup.
#[derive(Debug, Clone)]
pub struct Parser {
    image_base_url: String,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE_BASE_URL)
    }
}

impl Parser {
    /// Creates a parser that points image markup at `image_base_url`.
    #[must_use]
    pub fn new(image_base_url: impl Into<String>) -> Self {
        let mut image_base_url = image_base_url.into();
        while image_base_url.ends_with('/') {
            image_base_url.pop();
        }
        Self { image_base_url }
    }

    /// Returns the configured image host.
    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }

    /// Parses a package into a [`Game`], discarding diagnostics.
    #[must_use]
    pub fn parse(&self, raw: &str) -> Game {
        self.parse_with_diagnostics(raw).game
    }

    /// Parses a package into a [`Game`] and reports structural defects.
    #[must_use]
    pub fn parse_with_diagnostics(&self, raw: &str) -> ParseOutcome {
        scan(raw)
            .fold(Accumulator::default(), |acc, line| acc.step(self, line))
            .finish()
    }

    /// Markup for one image directive. Whitespace inside the file name is
    /// percent-encoded.
    #[must_use]
    pub fn image_markup(&self, name: &str) -> String {
        let name = name.split_whitespace().collect::<Vec<_>>().join("%20");
        format!(
            r#"<br /><img src="{}/{name}" alt="" class="py-4"/><br />"#,
            self.image_base_url
        )
    }

    /// Replaces every `(pic: name)` directive in `text` with image markup.
    #[must_use]
    pub fn substitute_images<'a>(&self, text: &'a str) -> Cow<'a, str> {
        IMAGE_DIRECTIVE_RE.replace_all(text, |caps: &Captures<'_>| self.image_markup(&caps[1]))
    }
}

/// Parses a package with the default image host.
#[must_use]
pub fn parse(raw: &str) -> Game {
    Parser::default().parse(raw)
}

/// Fold state: the game under construction and the open section.
#[derive(Debug, Default)]
struct Accumulator {
    game: Game,
    section: Section,
    diagnostics: Vec<ParseDiagnostic>,
}

impl Accumulator {
    fn step(mut self, parser: &Parser, line: Line<'_>) -> Self {
        if line.is_blank() {
            self.section = Section::None;
            return self;
        }

        let mut text = parser.substitute_images(line.text);
        if text.contains(IMAGE_MARKER) {
            self.diagnose(Some(line.number), DiagnosticKind::MalformedImageDirective);
            text = text.replace(IMAGE_MARKER, "").into();
        }
        if let Some((header, rest)) = Header::detect(&text) {
            self.open(header, line.number);
            self.append(rest);
        } else {
            self.append(&text);
        }
        self
    }

    fn open(&mut self, header: Header, line: usize) {
        self.section = match header {
            Header::Championship => {
                if self.game.title.is_some() || !self.game.tournaments.is_empty() {
                    let discarded = self.game.tournaments.len();
                    self.diagnose(Some(line), DiagnosticKind::RepeatedChampionship { discarded });
                }
                self.game = Game {
                    title: Some(String::new()),
                    tournaments: Vec::new(),
                };
                Section::GameTitle
            }
            Header::Tour => {
                self.finalize_open_tournament();
                self.game.tournaments.push(Tournament {
                    title: Some(String::new()),
                    ..Tournament::default()
                });
                Section::TournamentTitle
            }
            Header::Question => {
                if let Some(tournament) = self.game.tournaments.last_mut() {
                    let index = tournament.questions.len() + 1;
                    tournament.questions.push(Question {
                        index,
                        ..Question::default()
                    });
                    Section::Question
                } else {
                    self.diagnose(Some(line), DiagnosticKind::QuestionOutsideTournament);
                    Section::None
                }
            }
            Header::Answer => self.switch_to(Section::Answer, ANSWER_HEADER, line),
            Header::Comment => {
                let section = self.switch_to(Section::Comment, COMMENT_HEADER, line);
                if let Some(question) = self.current_question() {
                    question.comment.get_or_insert_with(String::new);
                }
                section
            }
        };
    }

    fn switch_to(&mut self, section: Section, header: &'static str, line: usize) -> Section {
        if self.current_question().is_some() {
            section
        } else {
            self.diagnose(Some(line), DiagnosticKind::OrphanSection { header });
            Section::None
        }
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(field) = self.field() {
            if !field.is_empty() {
                field.push(' ');
            }
            field.push_str(text);
        }
    }

    fn field(&mut self) -> Option<&mut String> {
        match self.section {
            Section::None => None,
            Section::GameTitle => Some(self.game.title.get_or_insert_with(String::new)),
            Section::TournamentTitle => self
                .game
                .tournaments
                .last_mut()
                .map(|t| t.title.get_or_insert_with(String::new)),
            Section::Question => self.current_question().map(|q| &mut q.question),
            Section::Answer => self.current_question().map(|q| &mut q.answer),
            Section::Comment => self
                .current_question()
                .map(|q| q.comment.get_or_insert_with(String::new)),
        }
    }

    fn current_question(&mut self) -> Option<&mut Question> {
        self.game
            .tournaments
            .last_mut()
            .and_then(|t| t.questions.last_mut())
    }

    fn finalize_open_tournament(&mut self) {
        if let Some(tournament) = self.game.tournaments.last_mut() {
            tournament.question_count = Some(tournament.questions.len());
        }
    }

    fn diagnose(&mut self, line: Option<usize>, kind: DiagnosticKind) {
        self.diagnostics.push(ParseDiagnostic { line, kind });
    }

    /// Flushes the last tournament's count and normalizes empty optional
    /// fields to `None`.
    fn finish(mut self) -> ParseOutcome {
        self.finalize_open_tournament();

        if self.game.title.as_deref().is_none_or(str::is_empty) {
            self.game.title = None;
            self.diagnose(None, DiagnosticKind::MissingGameTitle);
        }

        let mut late = Vec::new();
        for (i, tournament) in self.game.tournaments.iter_mut().enumerate() {
            let position = i + 1;
            if tournament.title.as_deref().is_none_or(str::is_empty) {
                tournament.title = None;
                late.push(DiagnosticKind::MissingTournamentTitle {
                    tournament: position,
                });
            }
            if tournament.questions.is_empty() {
                late.push(DiagnosticKind::EmptyTournament {
                    tournament: position,
                });
            }
            for question in &mut tournament.questions {
                if question.comment.as_deref().is_some_and(str::is_empty) {
                    question.comment = None;
                }
                if question.answer.is_empty() {
                    late.push(DiagnosticKind::MissingAnswer {
                        tournament: position,
                        question: question.index,
                    });
                }
            }
        }
        for kind in late {
            self.diagnose(None, kind);
        }

        ParseOutcome {
            game: self.game,
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_TOURS: &str = "\
Чемпионат:
Чемпионат Харькова
2002

Тур:
Первый тур

Вопрос 1:
Что это
такое?

Ответ:
Ничего.

Комментарий:
Просто так.

Вопрос 2:
Кто здесь?

Ответ:
Никого.

Тур:
Второй тур

Вопрос 1:
Где?

Ответ:
Там.
";

    #[test]
    fn parses_games_tours_and_questions() {
        let game = parse(TWO_TOURS);

        assert_eq!(game.title.as_deref(), Some("Чемпионат Харькова 2002"));
        assert_eq!(game.tournaments.len(), 2);

        let first = &game.tournaments[0];
        assert_eq!(first.title.as_deref(), Some("Первый тур"));
        assert_eq!(first.questions.len(), 2);
        assert_eq!(first.question_count, Some(2));
        assert_eq!(first.questions[0].question, "Что это такое?");
        assert_eq!(first.questions[0].answer, "Ничего.");
        assert_eq!(first.questions[0].comment.as_deref(), Some("Просто так."));
        assert_eq!(first.questions[1].comment, None);

        let second = &game.tournaments[1];
        assert_eq!(second.title.as_deref(), Some("Второй тур"));
        assert_eq!(second.questions.len(), 1);
        assert_eq!(second.questions[0].answer, "Там.");
    }

    #[test]
    fn last_tournament_count_is_flushed_at_end_of_input() {
        let game = parse(TWO_TOURS);
        let last = game.tournaments.last().unwrap();
        assert_eq!(last.question_count, Some(last.questions.len()));
        assert!(game.tournaments.iter().all(Tournament::is_selectable));
        assert!(game.is_selectable());
    }

    #[test]
    fn question_indices_are_contiguous_regardless_of_header_numbers() {
        let raw = "Тур:\nT\n\nВопрос 7:\na\n\nВопрос 3:\nb\n\nВопрос 99:\nc\n";
        let game = parse(raw);
        let indices: Vec<_> = game.tournaments[0]
            .questions
            .iter()
            .map(|q| q.index)
            .collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn blank_line_closes_the_current_field() {
        let raw = "\
Тур:
Тур

Вопрос 1:
Текст вопроса

Источник: это не должно никуда попасть
и это тоже

Ответ:
Да
";
        let game = parse(raw);
        let q = &game.tournaments[0].questions[0];
        assert_eq!(q.question, "Текст вопроса");
        assert_eq!(q.answer, "Да");
        assert!(!q.question.contains("Источник"));
        assert!(!q.answer.contains("Источник"));
    }

    #[test]
    fn image_directives_become_markup() {
        let raw = "Тур:\nT\n\nВопрос 1:\nСмотрите (pic: 20020123.jpg) сюда\n\nОтвет:\n(pic: 42.jpg)\n";
        let game = parse(raw);
        let q = &game.tournaments[0].questions[0];
        assert_eq!(
            q.question,
            "Смотрите <br /><img src=\"https://db.chgk.info/images/db/20020123.jpg\" alt=\"\" class=\"py-4\"/><br /> сюда"
        );
        assert!(q.answer.contains("/42.jpg"));
        assert!(!q.question.contains("(pic:"));
        assert!(!q.answer.contains("(pic:"));
    }

    #[test]
    fn image_names_with_spaces_are_encoded() {
        let raw = "Тур:\nT\n\nВопрос 1:\nСмотрите (pic: my pic.jpg)\n\nОтвет:\nда\n";
        let outcome = Parser::default().parse_with_diagnostics(raw);
        let q = &outcome.game.tournaments[0].questions[0];
        assert!(!q.question.contains("(pic:"));
        assert!(q.question.contains(r#"src="https://db.chgk.info/images/db/my%20pic.jpg""#));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn unreadable_image_directives_are_removed_and_reported() {
        let raw = "Тур:\nT\n\nВопрос 1:\nСмотрите (pic: )\nи (pic: broken.jpg\n\nОтвет:\nда\n";
        let outcome = Parser::default().parse_with_diagnostics(raw);
        let q = &outcome.game.tournaments[0].questions[0];
        assert!(!q.question.contains("(pic:"));
        assert!(q.question.contains("broken.jpg"));
        let malformed: Vec<_> = outcome
            .diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MalformedImageDirective)
            .map(|d| d.line)
            .collect();
        assert_eq!(malformed, vec![Some(5), Some(6)]);
    }

    #[test]
    fn image_directive_applies_inside_titles() {
        let parser = Parser::new("http://img.example/db/");
        let game = parser.parse("Чемпионат:\nКубок (pic: logo.jpg)\n");
        let title = game.title.unwrap();
        assert!(title.contains(r#"<img src="http://img.example/db/logo.jpg""#));
        assert!(!title.contains("(pic:"));
    }

    #[test]
    fn no_field_ever_keeps_the_raw_directive() {
        let raw = "Чемпионат:\n(pic: a.jpg)\n\nТур:\n(pic: b.jpg)\n\nВопрос 1:\n(pic: c.jpg) (pic: d.jpg)\n\nОтвет:\n(pic: e.jpg)\n\nКомментарий:\n(pic: f.jpg)\n";
        let game = parse(raw);
        let mut texts = vec![game.title.clone().unwrap()];
        for t in &game.tournaments {
            texts.push(t.title.clone().unwrap());
            for q in &t.questions {
                texts.push(q.question.clone());
                texts.push(q.answer.clone());
                texts.extend(q.comment.clone());
            }
        }
        assert_eq!(texts.len(), 5);
        assert!(texts.iter().all(|t| !t.contains("(pic:")));
    }

    #[test]
    fn header_lines_add_no_content_to_the_closed_field() {
        let raw = "Тур:\nT\n\nВопрос 1:\nтекст\nОтвет:\nответ\n";
        let game = parse(raw);
        let q = &game.tournaments[0].questions[0];
        assert_eq!(q.question, "текст");
        assert_eq!(q.answer, "ответ");
    }

    #[test]
    fn header_remainder_opens_the_new_field() {
        let raw = "Тур: Разминка\n\nВопрос 1: Сколько?\n\nОтвет: Три\n";
        let game = parse(raw);
        let t = &game.tournaments[0];
        assert_eq!(t.title.as_deref(), Some("Разминка"));
        assert_eq!(t.questions[0].question, "Сколько?");
        assert_eq!(t.questions[0].answer, "Три");
    }

    #[test]
    fn malformed_input_never_panics_and_reports_defects() {
        let raw = "Вопрос 1:\nсирота\n\nОтвет:\nнет\n\nТур:\n\nКомментарий:\nх\n";
        let outcome = Parser::default().parse_with_diagnostics(raw);

        assert_eq!(outcome.game.title, None);
        assert_eq!(outcome.game.tournaments.len(), 1);
        assert_eq!(outcome.game.tournaments[0].title, None);
        assert!(outcome.game.tournaments[0].questions.is_empty());
        assert!(!outcome.game.is_selectable());

        let kinds: Vec<_> = outcome.diagnostics.iter().map(|d| &d.kind).collect();
        assert!(kinds.contains(&&DiagnosticKind::QuestionOutsideTournament));
        assert!(kinds.contains(&&DiagnosticKind::OrphanSection {
            header: ANSWER_HEADER
        }));
        assert!(kinds.contains(&&DiagnosticKind::OrphanSection {
            header: COMMENT_HEADER
        }));
        assert!(kinds.contains(&&DiagnosticKind::MissingGameTitle));
        assert!(kinds.contains(&&DiagnosticKind::MissingTournamentTitle { tournament: 1 }));
        assert!(kinds.contains(&&DiagnosticKind::EmptyTournament { tournament: 1 }));
    }

    #[test]
    fn diagnostics_carry_line_numbers() {
        let outcome = Parser::default().parse_with_diagnostics("\n\nВопрос 1:\n");
        let first = &outcome.diagnostics[0];
        assert_eq!(first.line, Some(3));
        assert_eq!(
            first.to_string(),
            "question header before any tour header (line 3)"
        );
    }

    #[test]
    fn missing_answer_is_reported() {
        let outcome = Parser::default().parse_with_diagnostics("Тур:\nT\n\nВопрос 1:\nq\n");
        assert!(outcome.diagnostics.contains(&ParseDiagnostic {
            line: None,
            kind: DiagnosticKind::MissingAnswer {
                tournament: 1,
                question: 1
            },
        }));
    }

    #[test]
    fn repeated_championship_replaces_title() {
        let outcome =
            Parser::default().parse_with_diagnostics("Чемпионат:\nПервый\n\nЧемпионат:\nВторой\n");
        assert_eq!(outcome.game.title.as_deref(), Some("Второй"));
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::RepeatedChampionship { discarded: 0 }
        );
    }

    #[test]
    fn repeated_championship_starts_a_fresh_tour_list() {
        let raw = "\
Чемпионат:
A

Тур:
T1

Вопрос 1:
q1

Ответ:
a1

Чемпионат:
B

Тур:
T2

Вопрос 1:
q2

Ответ:
a2
";
        let outcome = Parser::default().parse_with_diagnostics(raw);
        let game = &outcome.game;
        assert_eq!(game.title.as_deref(), Some("B"));
        let titles: Vec<_> = game.tournaments.iter().map(|t| t.title.as_deref()).collect();
        assert_eq!(titles, vec![Some("T2")]);
        assert_eq!(game.tournaments[0].questions[0].question, "q2");
        assert_eq!(game.tournaments[0].question_count, Some(1));
        assert_eq!(
            outcome.diagnostics,
            vec![ParseDiagnostic {
                line: Some(13),
                kind: DiagnosticKind::RepeatedChampionship { discarded: 1 },
            }]
        );
    }

    #[test]
    fn championship_after_untitled_tours_discards_them() {
        let outcome = Parser::default()
            .parse_with_diagnostics("Тур:\nT0\n\nЧемпионат:\nC\n\nТур:\nT1\n\nВопрос 1:\nq\n\nОтвет:\na\n");
        assert_eq!(outcome.game.tournaments.len(), 1);
        assert_eq!(outcome.game.tournaments[0].title.as_deref(), Some("T1"));
        assert_eq!(
            outcome.diagnostics[0].kind,
            DiagnosticKind::RepeatedChampionship { discarded: 1 }
        );
    }

    #[test]
    fn empty_input_yields_empty_game() {
        let game = parse("");
        assert_eq!(game, Game::default());
    }

    #[test]
    fn header_detection_requires_line_start() {
        assert_eq!(
            Header::detect("Вопрос 12: текст"),
            Some((Header::Question, "текст"))
        );
        assert_eq!(Header::detect("Тур:"), Some((Header::Tour, "")));
        assert!(Header::detect("см. Вопрос 1:").is_none());
        assert!(Header::detect("Турнир:").is_none());
    }
}
