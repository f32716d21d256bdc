// 🖥️ Session Controller - menu-driven console loop
//
// Explicit state machine: Anonymous → Authenticated(member) → Anonymous …
// → Exiting. Input and output are injected so the whole session can be
// driven from a script and its console text captured.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{LibraryError, SessionError, SessionResult};
use crate::library::Library;
use crate::loader::{load_books, load_member_ratings};
use crate::ratings::{is_valid_rating, RATING_SCALE, UNRATED};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(usize),
    Exiting,
}

const MAIN_MENU: &str = "\
************** MENU **************
* 1. Add a new member            *
* 2. Add a new book              *
* 3. Login                       *
* 4. Quit                        *
**********************************
";

const MEMBER_MENU: &str = "\
************** MENU **************
* 1. Add a new member            *
* 2. Add a new book              *
* 3. Rate a book                 *
* 4. View ratings                *
* 5. See recommendations         *
* 6. Logout                      *
**********************************
";

const GOODBYE: &str = "Thank you for using the Book Recommendation Program!";

pub struct SessionController<R, W> {
    library: Library,
    input: R,
    output: W,
    state: SessionState,
}

impl<R: BufRead, W: Write> SessionController<R, W> {
    pub fn new(library: Library, input: R, output: W) -> Self {
        SessionController {
            library,
            input,
            output,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn into_parts(self) -> (Library, W) {
        (self.library, self.output)
    }

    // ========================================================================
    // STARTUP
    // ========================================================================

    /// Ask for any data file the settings leave out, then load both files.
    ///
    /// A file that cannot be loaded is reported and its dataset stays
    /// empty; the session carries on either way.
    pub fn load_data(&mut self, settings: &Settings) -> SessionResult<()> {
        let book_file = match &settings.book_file {
            Some(path) => path.clone(),
            None => self.prompt_path("Please enter the name of a book file: ")?,
        };
        let ratings_file = match &settings.ratings_file {
            Some(path) => path.clone(),
            None => self.prompt_path("Please enter the name of a ratings file: ")?,
        };

        match load_books(&book_file) {
            Ok(records) => {
                self.library.import_books(records);
            }
            Err(err) => self.report_load_failure(&book_file, &err)?,
        }

        match load_member_ratings(&ratings_file) {
            Ok(records) => {
                if let Err(err) = self.library.import_members(records) {
                    self.report_load_failure(&ratings_file, &anyhow::Error::new(err))?;
                }
            }
            Err(err) => self.report_load_failure(&ratings_file, &err)?,
        }

        writeln!(self.output, "# of books: {}", self.library.books().size())?;
        writeln!(self.output, "# of members: {}", self.library.members().size())?;
        writeln!(self.output)?;
        Ok(())
    }

    fn prompt_path(&mut self, prompt: &str) -> SessionResult<PathBuf> {
        let name = self.prompt_text(prompt)?;
        Ok(PathBuf::from(name))
    }

    fn report_load_failure(&mut self, path: &Path, err: &anyhow::Error) -> SessionResult<()> {
        let cause = format!("{:#}", err);
        warn!(file = %path.display(), error = %cause, "load failed");
        writeln!(self.output, "ERROR: cannot open file: {}", cause)?;
        Ok(())
    }

    // ========================================================================
    // MAIN LOOP
    // ========================================================================

    /// Run menus until the user quits or input runs out
    pub fn run(&mut self) -> SessionResult<()> {
        while self.state != SessionState::Exiting {
            match self.step() {
                Ok(()) => {}
                Err(SessionError::InputClosed) => {
                    info!("input closed, ending session");
                    if let SessionState::Authenticated(member_id) = self.state {
                        self.library.logout(member_id)?;
                    }
                    self.state = SessionState::Exiting;
                    writeln!(self.output)?;
                    writeln!(self.output, "{}", GOODBYE)?;
                }
                Err(err) => return Err(err),
            }
        }

        self.output.flush()?;
        Ok(())
    }

    /// Show the current menu, read one choice and apply it
    pub fn step(&mut self) -> SessionResult<()> {
        self.state = match self.state {
            SessionState::Anonymous => self.anonymous_step()?,
            SessionState::Authenticated(member_id) => self.member_step(member_id)?,
            SessionState::Exiting => SessionState::Exiting,
        };
        Ok(())
    }

    fn anonymous_step(&mut self) -> SessionResult<SessionState> {
        write!(self.output, "{}", MAIN_MENU)?;
        writeln!(self.output)?;

        let next = match self.prompt_menu(4)? {
            1 => {
                self.add_member()?;
                SessionState::Anonymous
            }
            2 => {
                self.add_book()?;
                SessionState::Anonymous
            }
            3 => match self.login()? {
                Some(member_id) => SessionState::Authenticated(member_id),
                None => SessionState::Anonymous,
            },
            _ => {
                writeln!(self.output, "{}", GOODBYE)?;
                SessionState::Exiting
            }
        };
        Ok(next)
    }

    fn member_step(&mut self, member_id: usize) -> SessionResult<SessionState> {
        write!(self.output, "{}", MEMBER_MENU)?;
        writeln!(self.output)?;

        match self.prompt_menu(6)? {
            1 => self.add_member()?,
            2 => self.add_book()?,
            3 => self.rate_book(member_id)?,
            4 => self.display_ratings(member_id)?,
            5 => self.display_recommendations(member_id)?,
            _ => {
                self.logout(member_id)?;
                return Ok(SessionState::Anonymous);
            }
        }
        Ok(SessionState::Authenticated(member_id))
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    fn login(&mut self) -> SessionResult<Option<usize>> {
        if self.library.members().is_empty() {
            writeln!(self.output, "There are no members to log in.")?;
            writeln!(self.output)?;
            return Ok(None);
        }

        write!(self.output, "Enter member account: ")?;
        let mut answer = self.read_number()?;
        writeln!(self.output)?;

        let member_id = loop {
            if let Some(id) = answer.and_then(|account| self.library.members().id_for_account(account)) {
                break id;
            }
            write!(
                self.output,
                "That is not a valid member Id. Please enter the correct id: "
            )?;
            answer = self.read_number()?;
            writeln!(self.output)?;
        };

        self.library.login(member_id)?;
        info!(member_id, "member logged in");

        let name = self.library.members().find_name(member_id)?;
        writeln!(self.output, "{}, you are logged in!", name)?;
        writeln!(self.output)?;
        Ok(Some(member_id))
    }

    fn logout(&mut self, member_id: usize) -> SessionResult<()> {
        self.library.logout(member_id)?;
        info!(member_id, "member logged out");
        writeln!(self.output)?;
        Ok(())
    }

    fn add_member(&mut self) -> SessionResult<()> {
        let name = self.prompt_text("Enter the name of the new member :")?;
        let member_id = self.library.add_member(name);

        let member = self.library.members().member(member_id)?;
        writeln!(
            self.output,
            "{} (member Id: {}) was added.",
            member.name,
            member.account()
        )?;
        writeln!(self.output)?;
        Ok(())
    }

    fn add_book(&mut self) -> SessionResult<()> {
        let author = self.prompt_text("Enter the author of the new book: ")?;
        let title = self.prompt_text("Enter the title of the new book: ")?;
        let year = self.prompt_text("Enter the year (or range of years) of the new book: ")?;
        writeln!(self.output)?;

        let index = self.library.add_book(author, title, year);
        writeln!(self.output, "{} was added.", self.library.books().get_book(index)?)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn rate_book(&mut self, member_id: usize) -> SessionResult<()> {
        let size = self.library.books().size();
        if size == 0 {
            writeln!(self.output, "There are no books to rate.")?;
            writeln!(self.output)?;
            return Ok(());
        }

        write!(self.output, "Enter the ISBN for the book you'd like to rate: ")?;
        let isbn = loop {
            match self.read_number()? {
                Some(isbn) if isbn >= 1 && isbn as usize <= size => break isbn,
                _ => write!(
                    self.output,
                    "That is an invalid isbn.  Please enter an ISBN: "
                )?,
            }
        };
        writeln!(self.output)?;

        let book_id = self
            .library
            .books()
            .find_isbn(&isbn.to_string())
            .ok_or(LibraryError::UnknownBook(isbn as usize - 1))?;
        let book = self.library.books().get_book(book_id)?;

        let current = self.library.ratings().get_rating(member_id, book_id);
        if current != UNRATED {
            writeln!(
                self.output,
                "Your current rating for {} => rating: {}",
                book, current
            )?;
            write!(self.output, "Would you like to re-rate this book (y/n)? ")?;

            let answer = loop {
                let answer = self.read_line()?;
                match answer.trim() {
                    "y" | "n" => break answer.trim().to_string(),
                    _ => write!(self.output, "Please enter (y/n): ")?,
                }
            };

            if answer == "n" {
                writeln!(self.output)?;
                return Ok(());
            }
        }

        write!(self.output, "Enter your rating: ")?;
        let mut answer = self.read_number()?;
        writeln!(self.output)?;

        let score = loop {
            if let Some(score) = answer
                .and_then(|value| i32::try_from(value).ok())
                .filter(|value| is_valid_rating(*value))
            {
                break score;
            }
            self.write_rating_legend()?;
            writeln!(self.output, "Please enter a valid rating: ")?;
            answer = self.read_number()?;
            writeln!(self.output)?;
        };

        if let Err(err) = self.library.rate(member_id, book_id, score) {
            warn!(member_id, book_id, error = %err, "rating refused");
            writeln!(self.output, "Unable to rate {}: {}", book, err)?;
            writeln!(self.output)?;
            return Ok(());
        }
        info!(member_id, book_id, score, "book rated");

        writeln!(self.output, "Your new rating for {} => rating: {}", book, score)?;
        writeln!(self.output)?;
        Ok(())
    }

    fn write_rating_legend(&mut self) -> SessionResult<()> {
        writeln!(self.output, "    ____ ______________________")?;
        for (score, meaning) in RATING_SCALE {
            writeln!(self.output, "   | {:>2} | {:<20} |", score, meaning)?;
        }
        writeln!(self.output, "    ---------------------------")?;
        Ok(())
    }

    fn display_ratings(&mut self, member_id: usize) -> SessionResult<()> {
        let library = &self.library;
        writeln!(
            self.output,
            "{}'s ratings...",
            library.members().find_name(member_id)?
        )?;

        for (index, book) in library.books().iter().enumerate() {
            writeln!(
                self.output,
                "{} => rating: {}",
                book,
                library.ratings().get_rating(member_id, index)
            )?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    fn display_recommendations(&mut self, member_id: usize) -> SessionResult<()> {
        let recommendation = match self.library.recommend(member_id) {
            Ok(recommendation) => recommendation,
            Err(LibraryError::NoOtherMembers(_)) => {
                writeln!(self.output, "There are no other members to compare with.")?;
                writeln!(self.output)?;
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };

        let library = &self.library;
        writeln!(
            self.output,
            "You have similar taste in books as {}!",
            library.members().find_name(recommendation.member_id)?
        )?;
        writeln!(self.output)?;

        writeln!(self.output, "Here are the books they really liked:")?;
        for index in &recommendation.really_liked {
            writeln!(self.output, "{}", library.books().book(*index)?)?;
        }
        writeln!(self.output)?;

        writeln!(self.output, "And here are the books they liked:")?;
        for index in &recommendation.liked {
            writeln!(self.output, "{}", library.books().book(*index)?)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    // ========================================================================
    // INPUT HELPERS
    // ========================================================================

    /// Next input line without its line terminator
    fn read_line(&mut self) -> SessionResult<String> {
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SessionError::InputClosed);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    /// Next line parsed as an integer; `None` if it is not one
    fn read_number(&mut self) -> SessionResult<Option<i64>> {
        Ok(self.read_line()?.trim().parse().ok())
    }

    /// Prompt until a non-blank line is entered
    fn prompt_text(&mut self, prompt: &str) -> SessionResult<String> {
        loop {
            write!(self.output, "{}", prompt)?;
            let line = self.read_line()?;
            let text = line.trim();
            if !text.is_empty() {
                return Ok(text.to_string());
            }
        }
    }

    /// Read a menu choice in `[1, max]`, re-prompting on anything else
    fn prompt_menu(&mut self, max: i64) -> SessionResult<i64> {
        write!(self.output, "Enter a menu option: ")?;
        let choice = loop {
            match self.read_number()? {
                Some(choice) if (1..=max).contains(&choice) => break choice,
                _ => write!(
                    self.output,
                    "That is not a valid selection. Please enter a menu option: "
                )?,
            }
        };
        writeln!(self.output)?;
        Ok(choice)
    }
}

// ============================================================================
// TESTS
// ============================================================================
