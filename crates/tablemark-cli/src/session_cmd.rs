//! Line-driven annotation session.
//!
//! Each input line is one user action. Actions run to completion in order;
//! a failed action prints an error, changes nothing, and the session goes on.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::{Path, PathBuf};

use tablemark_core::{
    AnnotateError, BoxType, Canvas, DrawingMode, PageImage, RenderOptions, Session, SvgOptions,
    load_page_image, render_annotations,
};
use tablemark_parse::LopdfDocument;

use crate::shared::read_shapes;

const HELP: &str = "\
Actions:
  box-type column|row    choose which collection the next save writes
  mode rect|transform    choose the drawing tool
  page N                 go to page N (1-based, clamped to the document)
  draw L T W H           draw a rectangle (rect tool)
  move I L T             move shape I (transform tool)
  resize I W H           resize shape I (transform tool)
  erase I                remove shape I from the canvas
  reset-canvas           remove every shape from the canvas
  load PATH              replace the canvas with shapes from a JSON file
  save                   save the canvas shapes under the selected box type
  create-boxes           intersect rows with columns and show all results
  clear                  empty the column and row annotations
  show                   show the column and row annotations
  history                show all intersection results
  render                 print the current page annotations as SVG
  open PATH              load another PDF
  quit                   end the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BoxType(BoxType),
    Mode(DrawingMode),
    Page(i64),
    Draw {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    Move {
        index: usize,
        left: f64,
        top: f64,
    },
    Resize {
        index: usize,
        width: f64,
        height: f64,
    },
    Erase(usize),
    ResetCanvas,
    Load(PathBuf),
    Save,
    CreateBoxes,
    Clear,
    Show,
    History,
    Render,
    Open(PathBuf),
    Help,
    Quit,
}

/// Parse one input line. Blank lines and `#` comments give `Ok(None)`.
pub fn parse_action(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let action = match name {
        "box-type" => Action::BoxType(one_arg(name, &args)?.parse()?),
        "mode" => Action::Mode(one_arg(name, &args)?.parse()?),
        "page" => {
            let arg = one_arg(name, &args)?;
            Action::Page(
                arg.parse()
                    .map_err(|_| format!("invalid page number: '{arg}'"))?,
            )
        }
        "draw" => {
            let [left, top, width, height] = numbers::<4>(name, &args)?;
            Action::Draw {
                left,
                top,
                width,
                height,
            }
        }
        "move" => {
            let (index, rest) = indexed(name, &args)?;
            let [left, top] = numbers::<2>(name, rest)?;
            Action::Move { index, left, top }
        }
        "resize" => {
            let (index, rest) = indexed(name, &args)?;
            let [width, height] = numbers::<2>(name, rest)?;
            Action::Resize {
                index,
                width,
                height,
            }
        }
        "erase" => {
            let (index, rest) = indexed(name, &args)?;
            no_args(name, rest)?;
            Action::Erase(index)
        }
        "load" => Action::Load(PathBuf::from(one_arg(name, &args)?)),
        "open" => Action::Open(PathBuf::from(one_arg(name, &args)?)),
        "reset-canvas" => no_args(name, &args).map(|_| Action::ResetCanvas)?,
        "save" => no_args(name, &args).map(|_| Action::Save)?,
        "create-boxes" => no_args(name, &args).map(|_| Action::CreateBoxes)?,
        "clear" => no_args(name, &args).map(|_| Action::Clear)?,
        "show" => no_args(name, &args).map(|_| Action::Show)?,
        "history" => no_args(name, &args).map(|_| Action::History)?,
        "render" => no_args(name, &args).map(|_| Action::Render)?,
        "help" => Action::Help,
        "quit" | "exit" => Action::Quit,
        other => return Err(format!("unknown action '{other}' (try 'help')")),
    };
    Ok(Some(action))
}

fn no_args(name: &str, args: &[&str]) -> Result<(), String> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(format!("'{name}' takes no arguments"))
    }
}

fn one_arg<'a>(name: &str, args: &[&'a str]) -> Result<&'a str, String> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(format!("'{name}' takes exactly one argument")),
    }
}

fn indexed<'a, 'b>(name: &str, args: &'b [&'a str]) -> Result<(usize, &'b [&'a str]), String> {
    let (first, rest) = args
        .split_first()
        .ok_or_else(|| format!("'{name}' needs a shape index"))?;
    let index = first
        .parse()
        .map_err(|_| format!("invalid shape index: '{first}'"))?;
    Ok((index, rest))
}

fn numbers<const N: usize>(name: &str, args: &[&str]) -> Result<[f64; N], String> {
    if args.len() != N {
        return Err(format!("'{name}' takes {N} numbers, got {}", args.len()));
    }
    let mut out = [0.0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("invalid number: '{arg}'"))?;
    }
    Ok(out)
}

/// What an action produced, besides state changes.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// The interactive surface: document, drawing canvas, selectors and session.
pub struct Annotator {
    document: Option<LopdfDocument>,
    session: Session,
    canvas: Canvas,
    box_type: BoxType,
    render: RenderOptions,
    password: Option<String>,
}

impl Annotator {
    pub fn new(document: Option<LopdfDocument>, render: RenderOptions) -> Self {
        Self {
            document,
            session: Session::new(),
            canvas: Canvas::new(),
            box_type: BoxType::default(),
            render,
            password: None,
        }
    }

    /// Password used by the `open` action for encrypted documents.
    pub fn with_password(mut self, password: Option<&str>) -> Self {
        self.password = password.map(str::to_owned);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn page_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.page_count())
    }

    /// The current page image; without it there is no drawing surface.
    fn page_image(&self) -> Result<PageImage, AnnotateError> {
        match &self.document {
            Some(doc) => load_page_image(doc, self.session.page_index(), &self.render),
            None => Err(AnnotateError::NoDocument),
        }
    }

    fn page_banner(&self) -> Result<String, AnnotateError> {
        let image = self.page_image()?;
        Ok(format!(
            "Page {} of {} ({} x {} px)",
            image.index + 1,
            self.page_count(),
            image.width,
            image.height
        ))
    }

    fn annotation_tables(&self) -> String {
        let store = self.session.store();
        format!(
            "Column Annotations:\n{}Row Annotations:\n{}",
            store.columns().to_table(),
            store.rows().to_table()
        )
    }

    fn history_text(&self) -> String {
        serde_json::to_string_pretty(&self.session.history_json()).unwrap_or_default()
    }

    /// Run one action.
    pub fn apply(&mut self, action: Action) -> Result<Outcome, String> {
        let message = match action {
            Action::BoxType(box_type) => {
                self.box_type = box_type;
                format!("Box type: {box_type}")
            }
            Action::Mode(mode) => {
                self.canvas.set_mode(mode);
                format!("Drawing tool: {mode}")
            }
            Action::Page(requested) => {
                let page_count = self.page_count();
                self.session.go_to_page(requested, page_count);
                self.page_banner().map_err(|e| e.to_string())?
            }
            Action::Draw {
                left,
                top,
                width,
                height,
            } => {
                self.page_image().map_err(|e| e.to_string())?;
                let index = self
                    .canvas
                    .draw(left, top, width, height)
                    .map_err(|e| e.to_string())?;
                format!("Drew shape {index}")
            }
            Action::Move { index, left, top } => {
                self.page_image().map_err(|e| e.to_string())?;
                self.canvas
                    .move_shape(index, left, top)
                    .map_err(|e| e.to_string())?;
                format!("Moved shape {index}")
            }
            Action::Resize {
                index,
                width,
                height,
            } => {
                self.page_image().map_err(|e| e.to_string())?;
                self.canvas
                    .resize_shape(index, width, height)
                    .map_err(|e| e.to_string())?;
                format!("Resized shape {index}")
            }
            Action::Erase(index) => {
                self.canvas.erase(index).map_err(|e| e.to_string())?;
                format!("Erased shape {index}")
            }
            Action::ResetCanvas => {
                self.canvas.reset();
                "Canvas cleared.".to_string()
            }
            Action::Load(path) => {
                let shapes = read_shapes(&path)?;
                let count = self
                    .canvas
                    .load(&serde_json::Value::Array(shapes))?;
                format!("Loaded {count} shapes onto the canvas")
            }
            Action::Save => {
                self.page_image().map_err(|e| e.to_string())?;
                let count = self
                    .session
                    .save(self.box_type, self.canvas.objects())
                    .map_err(|e| e.to_string())?;
                format!(
                    "Saved {count} {} annotations.\n{}",
                    self.box_type,
                    self.annotation_tables()
                )
            }
            Action::CreateBoxes => {
                self.session.create_boxes().map_err(|e| e.to_string())?;
                format!("Bounding Box Intersections (JSON):\n{}", self.history_text())
            }
            Action::Clear => {
                self.session.clear();
                "Annotations cleared.".to_string()
            }
            Action::Show => self.annotation_tables(),
            Action::History => self.history_text(),
            Action::Render => {
                let image = self.page_image().map_err(|e| e.to_string())?;
                let store = self.session.store();
                render_annotations(
                    f64::from(image.width),
                    f64::from(image.height),
                    store.columns().rects(),
                    store.rows().rects(),
                    self.session.latest_for_page(self.session.page_number()),
                    &SvgOptions::default(),
                )
                .trim_end()
                .to_string()
            }
            Action::Open(path) => {
                let doc = LopdfDocument::open_file(&path, self.password.as_deref())
                    .map_err(|e| format!("failed to open {}: {e}", path.display()))?;
                self.document = Some(doc);
                self.session.reset_page();
                let loaded = format!("Loaded {} ({} pages)", path.display(), self.page_count());
                match self.page_banner() {
                    Ok(banner) => format!("{loaded}\n{banner}"),
                    Err(e) => return Err(format!("{loaded}\n{e}")),
                }
            }
            Action::Help => HELP.to_string(),
            Action::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(message))
    }
}

/// Feed every line of `input` through the annotator.
pub fn drive<R: BufRead>(annotator: &mut Annotator, input: R, prompt: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if prompt {
        eprint!("> ");
    }
    for line in input.lines() {
        let line = line?;
        let result = parse_action(&line).and_then(|action| match action {
            Some(action) => {
                tracing::debug!(?action, "applying action");
                annotator.apply(action).map(Some)
            }
            None => Ok(None),
        });

        match result {
            Ok(Some(Outcome::Continue(message))) => writeln!(out, "{message}")?,
            Ok(Some(Outcome::Quit)) => break,
            Ok(None) => {}
            Err(e) => {
                out.flush()?;
                eprintln!("Error: {e}");
            }
        }
        if prompt {
            out.flush()?;
            eprint!("> ");
        }
    }
    out.flush()
}

pub fn run(
    file: Option<&Path>,
    script: Option<&Path>,
    dpi: f64,
    password: Option<&str>,
) -> Result<(), i32> {
    let document = match file {
        Some(path) => Some(crate::shared::open_document(path, password)?),
        None => None,
    };
    let mut annotator = Annotator::new(document, RenderOptions { dpi }).with_password(password);

    if annotator.document.is_some() {
        match annotator.page_banner() {
            Ok(banner) => println!("{banner}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    let result = match script {
        Some(path) => {
            let reader = File::open(path).map(BufReader::new).map_err(|e| {
                eprintln!("Error: cannot read {}: {e}", path.display());
                1
            })?;
            drive(&mut annotator, reader, false)
        }
        None => {
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            drive(&mut annotator, stdin.lock(), prompt)
        }
    };

    tracing::info!(
        matrices = annotator.session().history().len(),
        "session ended"
    );

    result.map_err(|e| {
        eprintln!("Error: {e}");
        1
    })
}
