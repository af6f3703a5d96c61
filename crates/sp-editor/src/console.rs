//! Line-oriented console driving the editor
//!
//! Each input line becomes zero or more [`EditorAction`]s queued on the
//! shared state and dispatched immediately. Notifications raised while
//! handling the line are printed after it.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;
use sp_core::{Direction, Price, RackType, Side, SlotPatch};

use crate::actions::{ActionContext, process_pending_actions};
use crate::components::CountChange;
use crate::persistence::Persistence;
use crate::state::{EditorAction, SharedEditorState};
use crate::store::NotificationKind;

pub const HELP: &str = "\
Commands:
  place <x> <z>                   place an aisle on the floor
  select <aisle-number>           select an aisle
  rack <index>                    select a rack of the selected aisle (1-based)
  deselect | remove | cancel      clear selection | delete selected aisle | stop placing
  move <up|down|left|right>       move the selected aisle
  rotate                          rotate the selected aisle a quarter turn
  key <KeyName>                   send a key press (ArrowUp, Escape, ...)
  add-rack [d-rack|l-rack|r-rack] append a rack to the selected aisle
  remove-rack                     drop the last rack of the selected aisle
  move-rack <dir> | rotate-rack   transform the selected rack
  hide <left|right|none>          hide one side of the selected rack
  toggle <left|right>             hide or show one side
  shelf <left|right> <add|remove> change the shelf count of a side
  pick-shelf <left|right> <n>     select a shelf (1-based) for slot editing
  slot <add|remove>               change the slot count of the selected shelf
  edit <slot-id> field=value ...  set productId, name, description, price, quantity
  search <term>                   find a product and focus on it
  new [name] | rename <name>      start a new layout | rename this one
  save | load <id> | delete | list | assign <owner-id>
  export <file> | import <file>   offline RON drafts
  show | help | quit";

/// Console input errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConsoleError {
    #[error("Unknown command: {0} (try 'help')")]
    UnknownCommand(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid {name}: {value}")]
    InvalidArgument { name: &'static str, value: String },
    #[error("Unterminated quote")]
    UnterminatedQuote,
}

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Actions(Vec<EditorAction>),
    /// Select an aisle by its display number
    SelectAisle(u32),
    /// Select a rack of the selected aisle by 0-based index
    SelectRack(usize),
    Show,
    Help,
    Quit,
    Empty,
}

/// Split a line on whitespace, keeping double-quoted runs together
fn tokenize(line: &str) -> Result<Vec<String>, ConsoleError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if in_quotes {
        return Err(ConsoleError::UnterminatedQuote);
    }
    if has_token {
        tokens.push(current);
    }
    Ok(tokens)
}

fn arg<'a>(args: &'a [String], index: usize, name: &'static str) -> Result<&'a str, ConsoleError> {
    args.get(index)
        .map(String::as_str)
        .ok_or(ConsoleError::MissingArgument(name))
}

fn invalid(name: &'static str, value: &str) -> ConsoleError {
    ConsoleError::InvalidArgument {
        name,
        value: value.to_string(),
    }
}

fn parse_number<T: std::str::FromStr>(
    args: &[String],
    index: usize,
    name: &'static str,
) -> Result<T, ConsoleError> {
    let value = arg(args, index, name)?;
    value.parse().map_err(|_| invalid(name, value))
}

/// Floor coordinate; `NaN` and infinities are rejected
fn parse_coordinate(args: &[String], index: usize, name: &'static str) -> Result<f32, ConsoleError> {
    let value = arg(args, index, name)?;
    value
        .parse::<f32>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| invalid(name, value))
}

fn parse_direction(args: &[String]) -> Result<Direction, ConsoleError> {
    let value = arg(args, 0, "direction")?;
    Direction::parse(value).ok_or_else(|| invalid("direction", value))
}

fn parse_side(args: &[String], index: usize) -> Result<Side, ConsoleError> {
    let value = arg(args, index, "side")?;
    Side::parse(value).ok_or_else(|| invalid("side", value))
}

fn parse_change(args: &[String], index: usize) -> Result<CountChange, ConsoleError> {
    let value = arg(args, index, "add|remove")?;
    CountChange::parse(value).ok_or_else(|| invalid("count change", value))
}

/// Read `field=value` pairs into a patch
fn parse_patch(pairs: &[String]) -> Result<SlotPatch, ConsoleError> {
    let mut patch = SlotPatch::default();
    for pair in pairs {
        let (field, value) = pair.split_once('=').ok_or_else(|| invalid("field", pair))?;
        match field {
            "productId" | "id" => patch.product_id = Some(value.to_string()),
            "name" | "productName" => patch.product_name = Some(value.to_string()),
            "description" | "desc" => patch.description = Some(value.to_string()),
            "price" => {
                let price: Price = value.parse().map_err(|_| invalid("price", value))?;
                patch.price = Some(price);
            }
            "quantity" | "qty" => {
                let quantity: u32 = value.parse().map_err(|_| invalid("quantity", value))?;
                patch.quantity = Some(quantity);
            }
            other => return Err(invalid("field", other)),
        }
    }
    if patch.is_empty() {
        return Err(ConsoleError::MissingArgument("field=value"));
    }
    Ok(patch)
}

fn single(action: EditorAction) -> Result<Command, ConsoleError> {
    Ok(Command::Actions(vec![action]))
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<Command, ConsoleError> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(Command::Empty);
    };
    let rest = || args.join(" ");

    match name.as_str() {
        "place" => {
            let x = parse_coordinate(args, 0, "x")?;
            let z = parse_coordinate(args, 1, "z")?;
            Ok(Command::Actions(vec![
                EditorAction::BeginPlacing,
                EditorAction::PlaceAisle(Vec3::new(x, 0.0, z)),
            ]))
        }
        "select" => Ok(Command::SelectAisle(parse_number(args, 0, "aisle number")?)),
        "rack" => {
            let index: usize = parse_number(args, 0, "rack index")?;
            if index == 0 {
                return Err(invalid("rack index", "0"));
            }
            Ok(Command::SelectRack(index - 1))
        }
        "deselect" => single(EditorAction::DeselectAll),
        "remove" => single(EditorAction::RemoveSelected),
        "cancel" => single(EditorAction::CancelPlacing),
        "move" => single(EditorAction::MoveAisle(parse_direction(args)?)),
        "rotate" => single(EditorAction::RotateAisle),
        "key" => single(EditorAction::KeyPress(arg(args, 0, "key")?.to_string())),
        "add-rack" => {
            let rack_type = match args.first() {
                Some(value) => RackType::parse(value).ok_or_else(|| invalid("rack type", value))?,
                None => RackType::DRack,
            };
            single(EditorAction::AddRack(rack_type))
        }
        "remove-rack" => single(EditorAction::RemoveRack),
        "move-rack" => single(EditorAction::MoveRack(parse_direction(args)?)),
        "rotate-rack" => single(EditorAction::RotateRack),
        "hide" => {
            let value = arg(args, 0, "side")?;
            let hidden = match value {
                "none" | "both" => None,
                other => Some(Side::parse(other).ok_or_else(|| invalid("side", other))?),
            };
            single(EditorAction::SetHiddenSide(hidden))
        }
        "toggle" => single(EditorAction::ToggleSide(parse_side(args, 0)?)),
        "shelf" => single(EditorAction::ChangeShelfCount {
            side: parse_side(args, 0)?,
            change: parse_change(args, 1)?,
        }),
        "pick-shelf" => {
            let side = parse_side(args, 0)?;
            let number: usize = parse_number(args, 1, "shelf number")?;
            if number == 0 {
                return Err(invalid("shelf number", "0"));
            }
            single(EditorAction::SelectShelf {
                side,
                index: number - 1,
            })
        }
        "slot" => single(EditorAction::ChangeSlotCount(parse_change(args, 0)?)),
        "edit" => {
            let slot_id = arg(args, 0, "slot id")?.to_string();
            let patch = parse_patch(&args[1..])?;
            single(EditorAction::UpdateSlot { slot_id, patch })
        }
        "search" => {
            if args.is_empty() {
                return Err(ConsoleError::MissingArgument("search term"));
            }
            single(EditorAction::Search(rest()))
        }
        "new" => single(EditorAction::NewLayout((!args.is_empty()).then(rest))),
        "rename" => {
            if args.is_empty() {
                return Err(ConsoleError::MissingArgument("name"));
            }
            single(EditorAction::Rename(rest()))
        }
        "save" => single(EditorAction::Save),
        "load" => single(EditorAction::Load(arg(args, 0, "layout id")?.to_string())),
        "delete" => single(EditorAction::Delete),
        "list" => single(EditorAction::List),
        "assign" => single(EditorAction::Assign {
            owner_id: arg(args, 0, "owner id")?.to_string(),
        }),
        "export" => single(EditorAction::ExportDraft(PathBuf::from(arg(args, 0, "file")?))),
        "import" => single(EditorAction::ImportDraft(PathBuf::from(arg(args, 0, "file")?))),
        "show" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}

/// What the console loop should do after a line
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Continue(Vec<String>),
    Quit,
}

pub struct Console {
    state: SharedEditorState,
    persistence: Persistence,
    last_tick: Instant,
}

impl Console {
    pub fn new(state: SharedEditorState, persistence: Persistence) -> Self {
        Self {
            state,
            persistence,
            last_tick: Instant::now(),
        }
    }

    pub fn state(&self) -> &SharedEditorState {
        &self.state
    }

    /// Handle one input line
    pub fn execute(&mut self, line: &str) -> Step {
        self.advance_clock();

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => return Step::Continue(vec![e.to_string()]),
        };

        let mut output = Vec::new();
        match command {
            Command::Empty => {}
            Command::Quit => return Step::Quit,
            Command::Help => output.extend(HELP.lines().map(str::to_string)),
            Command::Show => output.extend(self.render_tree()),
            Command::SelectAisle(number) => {
                let aisle = self.state.lock().store.layout().aisle_by_number(number).map(|a| a.id);
                match aisle {
                    Some(aisle) => self.run(vec![EditorAction::SelectAisle(aisle)]),
                    None => output.push(format!("No aisle A{}", number)),
                }
            }
            Command::SelectRack(index) => {
                let target = {
                    let state = self.state.lock();
                    state.store.selection().aisle().and_then(|aisle| {
                        let rack = *state.store.layout().aisle(aisle)?.racks.get(index)?;
                        Some((aisle, rack))
                    })
                };
                match target {
                    Some((aisle, rack)) => self.run(vec![EditorAction::SelectRack { aisle, rack }]),
                    None => output.push(format!("No rack {} in the selected aisle", index + 1)),
                }
            }
            Command::Actions(actions) => {
                let searched = actions
                    .iter()
                    .any(|action| matches!(action, EditorAction::Search(_)));
                let listed = actions.contains(&EditorAction::List);
                self.run(actions);
                if searched {
                    output.extend(self.render_highlight());
                }
                if listed {
                    output.extend(self.render_listing());
                }
            }
        }

        output.extend(self.drain_notifications());
        Step::Continue(output)
    }

    fn run(&self, actions: Vec<EditorAction>) {
        {
            let mut state = self.state.lock();
            for action in actions {
                state.queue_action(action);
            }
        }
        let ctx = ActionContext::new(&self.state, &self.persistence);
        process_pending_actions(&ctx);
    }

    /// Feed wall-clock time to the focus animation and notification expiry
    fn advance_clock(&mut self) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;
        let mut state = self.state.lock();
        state.store.tick(elapsed);
        state.store.expire(now);
    }

    fn drain_notifications(&self) -> Vec<String> {
        self.state
            .lock()
            .store
            .notifications_mut()
            .drain()
            .into_iter()
            .map(|notification| match notification.kind {
                NotificationKind::Transient => format!("* {}", notification.message),
                NotificationKind::Blocking => format!("! {}", notification.message),
            })
            .collect()
    }

    fn render_highlight(&self) -> Vec<String> {
        let state = self.state.lock();
        match state.store.highlight() {
            Some(hit) => vec![format!(
                "Found '{}' at {} (world {:.2}, {:.2}, {:.2})",
                hit.product_name,
                hit.slot_label(),
                hit.world_position.x,
                hit.world_position.y,
                hit.world_position.z
            )],
            None => Vec::new(),
        }
    }

    fn render_listing(&self) -> Vec<String> {
        let state = self.state.lock();
        if state.layouts.is_empty() {
            return vec!["No stored layouts".to_string()];
        }
        state
            .layouts
            .iter()
            .map(|summary| {
                format!(
                    "{}  {}  ({} aisles, {} racks){}",
                    summary.id.as_deref().unwrap_or("-"),
                    summary.name,
                    summary.aisle_count,
                    summary.rack_count,
                    summary
                        .owner
                        .as_deref()
                        .map(|owner| format!("  owner {}", owner))
                        .unwrap_or_default()
                )
            })
            .collect()
    }

    /// Text rendering of the layout tree
    pub fn render_tree(&self) -> Vec<String> {
        let state = self.state.lock();
        let store = &state.store;
        let layout = store.layout();
        let selection = store.selection();

        let mut lines = vec![format!(
            "Layout '{}' (id {}){}{}",
            layout.name,
            layout.id.as_deref().unwrap_or("-"),
            if store.has_pending_changes() { ", unsaved changes" } else { "" },
            if store.is_placing() { ", placing" } else { "" },
        )];
        for aisle in layout.aisles() {
            let marker = if selection.aisle() == Some(aisle.id) { " *" } else { "" };
            lines.push(format!(
                "A{} at ({:.2}, {:.2}, {:.2}) {}{}",
                aisle.number, aisle.position.x, aisle.position.y, aisle.position.z, aisle.degree, marker
            ));
            for (index, rack) in layout.racks_of(aisle.id).into_iter().enumerate() {
                let marker = if selection.rack() == Some(rack.id) { " *" } else { "" };
                let sides: Vec<String> = Side::BOTH
                    .iter()
                    .map(|side| {
                        let counts: Vec<String> = rack
                            .side(*side)
                            .slots_per_shelf()
                            .iter()
                            .map(usize::to_string)
                            .collect();
                        let hidden = if rack.rack_type.is_visible(*side) { "" } else { " (hidden)" };
                        format!("{}: {}{}", side.code(), counts.join(","), hidden)
                    })
                    .collect();
                lines.push(format!(
                    "  {} {} at ({:.2}, {:.2}) {}  {}{}",
                    sp_core::rack_label(aisle.number, index),
                    rack.rack_type,
                    rack.position.x,
                    rack.position.z,
                    rack.degree,
                    sides.join("  "),
                    marker
                ));
            }
        }
        lines
    }

    /// Read commands until end of input or `quit`
    pub fn run_loop<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> std::io::Result<()> {
        writeln!(output, "shelfplan console, type 'help' for commands")?;
        for line in input.lines() {
            let line = line?;
            match self.execute(&line) {
                Step::Continue(lines) => {
                    for line in lines {
                        writeln!(output, "{}", line)?;
                    }
                }
                Step::Quit => break,
            }
            output.flush()?;
        }
        Ok(())
    }
}
