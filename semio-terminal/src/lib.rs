/// Terminal sign editor: ASCII viewport plus an editing panel
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use nalgebra::Point3;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

use semio_core::command;
use semio_core::{
    AnchorKey, Camera, CommandError, EditorConfig, Mesh, Outcome, PointId, PointStore, PointUpdate,
    Rgb, Selection, Transform,
};

pub mod controls;
pub mod logging;
pub mod pick;
pub mod renderer;
pub mod scene;

pub use controls::Controls;
pub use pick::pick_at;
pub use renderer::AsciiRenderer;
pub use scene::SceneSync;

/// Columns taken by the editing panel on the left
pub const PANEL_WIDTH: u16 = 34;
/// Row of the first entry in the point list
const LIST_TOP: u16 = 2;
const MAX_LIST_ROWS: usize = 8;
const ORBIT_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 1.1;
/// Half the side of each offset plane grid
const GRID_HALF_SIZE: f32 = 200.0;
const GRID_DIVISIONS: usize = 10;
const GRID_COLOR: Rgb = Rgb::new(0.45, 0.45, 0.45);
const ATTRACTOR_SIZE: f32 = 8.0;

/// What keyboard input currently edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing the name of a new point
    Naming(String),
    /// Typing a command line
    Command(String),
}

/// Main application struct for the terminal editor
pub struct TerminalApp {
    store: PointStore<SceneSync>,
    camera: Camera,
    renderer: AsciiRenderer,
    controls: Controls,
    attractor_mesh: Mesh,
    mode: InputMode,
    status: String,
    width: u16,
    height: u16,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &EditorConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// Build an editor for a terminal of `width` x `height` cells
    pub fn with_size(config: &EditorConfig, width: u16, height: u16) -> Self {
        let mut app = Self {
            store: PointStore::from_config(config, SceneSync::new()),
            camera: Camera::new(1, 1),
            renderer: AsciiRenderer::new(1, 1),
            controls: Controls::new(&config.controls),
            attractor_mesh: Mesh::sphere(ATTRACTOR_SIZE, 12, 8),
            mode: InputMode::Normal,
            status: String::from("a: add a sign   : command   q: quit"),
            width,
            height,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        };
        app.resize(width, height);
        app
    }

    pub fn store(&self) -> &PointStore<SceneSync> {
        &self.store
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Viewport size in cells
    pub fn viewport_size(&self) -> (usize, usize) {
        (
            usize::from(self.width.saturating_sub(PANEL_WIDTH)).max(1),
            usize::from(self.height.saturating_sub(2)).max(1),
        )
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let (vw, vh) = self.viewport_size();
        self.renderer.resize(vw, vh);
        // Terminal cells are about twice as tall as wide
        self.camera.set_aspect(vw as f32 / (vh as f32 * 2.0));
    }

    /// Run a command script against the editor's point store
    pub fn run_script(&mut self, script: &str) -> Result<usize, CommandError> {
        let count = command::run_script(&mut self.store, script, &self.controls.draft)?;
        self.refresh_controls();
        Ok(count)
    }

    /// Write one line per point: attributes, placement and selection
    pub fn dump<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for line in self.describe_points() {
            writeln!(writer, "{line}")?;
        }
        Ok(())
    }

    pub fn describe_points(&self) -> Vec<String> {
        self.store
            .points()
            .enumerate()
            .map(|(index, point)| {
                let values = point.intensities();
                let position = point.position();
                format!(
                    "{}. {} icon={} index={} symbol={} type={} logic={} position=({:.2}, {:.2}, {:.2}) color={} shape={:?}{}",
                    index + 1,
                    point.name(),
                    values.icon(),
                    values.index(),
                    values.symbol(),
                    point.sign_type(),
                    point.sign_logic(),
                    position.x,
                    position.y,
                    position.z,
                    point.color(),
                    point.shape(),
                    if self.store.is_selected(point.id()) { " [selected]" } else { "" },
                )
            })
            .collect()
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(MouseEvent { kind, column, row, .. }) => match kind {
                MouseEventKind::Down(MouseButton::Left) => self.handle_click(column, row),
                MouseEventKind::ScrollUp => self.camera.zoom(1.0 / ZOOM_STEP),
                MouseEventKind::ScrollDown => self.camera.zoom(ZOOM_STEP),
                _ => {}
            },
            Event::Resize(width, height) => self.resize(width, height),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Normal => self.handle_normal_key(key.code),
            InputMode::Naming(buffer) => {
                if let Some(name) = edit_line(buffer, key.code, |b| self.mode = InputMode::Naming(b)) {
                    self.add_point(&name);
                }
            }
            InputMode::Command(buffer) => {
                if let Some(line) = edit_line(buffer, key.code, |b| self.mode = InputMode::Command(b)) {
                    self.run_command(&line);
                }
            }
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Left => self.camera.orbit(-ORBIT_STEP, 0.0),
            KeyCode::Right => self.camera.orbit(ORBIT_STEP, 0.0),
            KeyCode::Up => self.camera.orbit(0.0, ORBIT_STEP),
            KeyCode::Down => self.camera.orbit(0.0, -ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom(1.0 / ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom(ZOOM_STEP),
            KeyCode::Char('p') => self.camera.toggle_mode(),
            KeyCode::Char('1') => self.controls.select_slider(AnchorKey::Icon),
            KeyCode::Char('2') => self.controls.select_slider(AnchorKey::Index),
            KeyCode::Char('3') => self.controls.select_slider(AnchorKey::Symbol),
            KeyCode::Char('l') | KeyCode::Char(']') => {
                let changes = self.controls.nudge(1);
                self.apply_to_selected(&changes);
            }
            KeyCode::Char('h') | KeyCode::Char('[') => {
                let changes = self.controls.nudge(-1);
                self.apply_to_selected(&changes);
            }
            KeyCode::Char('t') => {
                let changes = self.controls.cycle_type();
                self.apply_to_selected(&changes);
            }
            KeyCode::Char('g') => {
                let changes = self.controls.cycle_logic();
                self.apply_to_selected(&changes);
            }
            KeyCode::Char('a') => self.mode = InputMode::Naming(String::new()),
            KeyCode::Char(':') => self.mode = InputMode::Command(String::new()),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Tab => self.select_next(),
            KeyCode::Esc => {
                if self.store.selected_id().is_some() {
                    self.select(None);
                }
            }
            _ => {}
        }
    }

    /// Left click at terminal cell (`column`, `row`)
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if column < PANEL_WIDTH {
            let entry = usize::from(row.wrapping_sub(LIST_TOP));
            if row >= LIST_TOP && entry < self.store.len().min(MAX_LIST_ROWS) {
                let id = self.store.nth(entry).map(|point| point.id());
                if let Some(id) = id {
                    self.select(Some(id));
                }
            }
            return;
        }
        if row == 0 || row + 1 >= self.height {
            return;
        }

        let (vw, vh) = self.viewport_size();
        let hit = pick_at(&self.store, &self.camera, vw, vh, column - PANEL_WIDTH, row - 1);
        if let Some(id) = hit {
            self.select(Some(id));
        }
    }

    fn add_point(&mut self, name: &str) {
        let draft = self.controls.draft;
        match self
            .store
            .add(name, draft.intensities, draft.sign_type, draft.sign_logic)
        {
            Ok(_) => self.status = format!("added `{}`", name.trim()),
            Err(err) => self.status = err.to_string(),
        }
        self.refresh_controls();
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.store.selected_id() else {
            self.status = "no sign selected".to_string();
            return;
        };
        let name = self.point_name(id);
        self.store.delete(id);
        self.status = format!("deleted `{name}`");
    }

    fn select_next(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let next = match self.store.selected_id().and_then(|id| self.store.position_of(id)) {
            Some(index) => (index + 1) % self.store.len(),
            None => 0,
        };
        let id = self.store.nth(next).map(|point| point.id());
        if id.is_some() && id != self.store.selected_id() {
            self.select(id);
        }
    }

    fn select(&mut self, id: Option<PointId>) {
        match self.store.select(id) {
            Ok(Selection::Selected(id)) => self.status = format!("selected `{}`", self.point_name(id)),
            Ok(Selection::Unselected) => self.status = "selection cleared".to_string(),
            Err(err) => self.status = err.to_string(),
        }
        self.refresh_controls();
    }

    /// Push a control change to the selected point; without a selection it
    /// only changes the draft.
    fn apply_to_selected(&mut self, changes: &PointUpdate) {
        let Some(id) = self.store.selected_id() else {
            return;
        };
        if let Err(err) = self.store.update(id, changes) {
            tracing::warn!(%id, error = %err, "control change dropped");
            self.status = err.to_string();
        }
    }

    fn run_command(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let result = command::parse_command(line)
            .and_then(|parsed| command::execute(&mut self.store, &parsed, &self.controls.draft));
        self.status = match result {
            Ok(Outcome::Added(id)) => format!("added `{}`", self.point_name(id)),
            Ok(Outcome::Updated(id)) => format!("updated `{}`", self.point_name(id)),
            Ok(Outcome::Selected(Selection::Selected(id))) => {
                format!("selected `{}`", self.point_name(id))
            }
            Ok(Outcome::Selected(Selection::Unselected)) => "selection cleared".to_string(),
            Ok(Outcome::Deleted(_)) => "deleted".to_string(),
            Err(err) => {
                tracing::debug!(line, error = %err, "command failed");
                err.to_string()
            }
        };
        self.refresh_controls();
    }

    /// Make the panel mirror the selected point
    fn refresh_controls(&mut self) {
        if let Some(point) = self.store.selected() {
            self.controls.load(point);
        }
    }

    fn point_name(&self, id: PointId) -> String {
        self.store
            .get(id)
            .map(|point| point.name().to_string())
            .unwrap_or_default()
    }

    /// Text rows of the editing panel, top to bottom starting at row 1
    pub fn panel_lines(&self) -> Vec<String> {
        let mut lines = vec![format!(" Signs ({})", self.store.len())];
        for (index, point) in self.store.points().enumerate().take(MAX_LIST_ROWS) {
            let marker = if self.store.is_selected(point.id()) { '*' } else { ' ' };
            lines.push(format!(" {marker} {}. {}", index + 1, point.name()));
        }
        if self.store.is_empty() {
            lines.push("   none yet, press a".to_string());
        } else if self.store.len() > MAX_LIST_ROWS {
            lines.push(format!("   ... {} more", self.store.len() - MAX_LIST_ROWS));
        }

        lines.push(String::new());
        lines.push(match self.store.selected() {
            Some(point) => format!(" Editing `{}`", point.name()),
            None => " New sign".to_string(),
        });
        let draft = &self.controls.draft;
        for (number, key) in AnchorKey::ALL.iter().enumerate() {
            let value = draft.intensities.get(*key);
            let filled = usize::from(value) / 10;
            lines.push(format!(
                " {}{} {:<6} [{}{}] {:>3}",
                if self.controls.active == *key { '>' } else { ' ' },
                number + 1,
                key.label(),
                "#".repeat(filled),
                ".".repeat(10 - filled),
                value,
            ));
        }
        lines.push(format!(" Type  (t)  {}", draft.sign_type));
        lines.push(format!(" Logic (g)  {}", draft.sign_logic));

        lines.push(String::new());
        lines.push(" arrows orbit  +/- zoom  p proj".to_string());
        lines.push(format!(" 1-3 slider  h/l adjust by {}", self.controls.step()));
        lines.push(" a add  x delete  tab next".to_string());
        lines.push(" esc deselect  : command  q quit".to_string());
        lines
    }

    fn render(&mut self) -> io::Result<()> {
        self.draw_scene();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, PANEL_WIDTH, 1)?;

        let panel_width = usize::from(PANEL_WIDTH);
        let last_row = self.height.saturating_sub(1);
        let mut lines = self.panel_lines().into_iter();
        for row in 1..last_row {
            let line = lines.next().unwrap_or_default();
            queue!(
                stdout,
                cursor::MoveTo(0, row),
                SetForegroundColor(Color::Grey),
                Print(fit(&line, panel_width))
            )?;
        }

        // Header and status line
        let width = usize::from(self.width);
        let header = format!(
            "Semio | {} signs | FPS: {:.1} | {:?}",
            self.store.len(),
            self.fps,
            self.camera.mode
        );
        let status = match &self.mode {
            InputMode::Normal => self.status.clone(),
            InputMode::Naming(buffer) => format!("name: {buffer}_"),
            InputMode::Command(buffer) => format!(":{buffer}_"),
        };
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(fit(&header, width)),
            cursor::MoveTo(0, last_row),
            SetForegroundColor(Color::White),
            Print(fit(&status, width)),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }

    /// Rasterize the offset planes, attractors and points into the viewport
    pub fn draw_scene(&mut self) {
        self.renderer.clear();

        let anchors = self.store.projector().anchors();
        let depth = anchors.offset_depth();
        let step = GRID_HALF_SIZE * 2.0 / GRID_DIVISIONS as f32;
        for plane in [-depth, 0.0, depth] {
            for line in 0..=GRID_DIVISIONS {
                let fixed = -GRID_HALF_SIZE + line as f32 * step;
                for sample in 0..=GRID_DIVISIONS * 4 {
                    let moving = -GRID_HALF_SIZE + sample as f32 * step / 4.0;
                    let (a, b) = (Point3::new(fixed, moving, plane), Point3::new(moving, fixed, plane));
                    self.renderer.plot(&a, &self.camera, '.', GRID_COLOR);
                    self.renderer.plot(&b, &self.camera, '.', GRID_COLOR);
                }
            }
        }

        for attractor in anchors.iter() {
            let p = attractor.position;
            let model = Transform::translation_matrix(p.x, p.y, p.z);
            self.renderer
                .render_mesh(&self.attractor_mesh, &model, &self.camera, attractor.color);
        }

        let selected = self.store.sync().selected();
        for (id, object, mesh) in self.store.sync().iter() {
            let color = if selected == Some(id) {
                renderer::SELECTED_COLOR
            } else {
                object.color
            };
            self.renderer.render_mesh(mesh, &object.model, &self.camera, color);
        }
    }

    pub fn renderer(&self) -> &AsciiRenderer {
        &self.renderer
    }
}

/// Apply one key to a line being typed. Returns the finished line on Enter;
/// `keep` is called with the buffer while editing continues.
fn edit_line(mut buffer: String, code: KeyCode, keep: impl FnOnce(String)) -> Option<String> {
    match code {
        KeyCode::Enter => return Some(buffer),
        KeyCode::Esc => return None,
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) => buffer.push(c),
        _ => {}
    }
    keep(buffer);
    None
}

/// Truncate or pad `text` to exactly `width` characters
fn fit(text: &str, width: usize) -> String {
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}
