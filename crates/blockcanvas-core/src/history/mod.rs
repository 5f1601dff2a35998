//! Command history engine.
//!
//! Every document mutation that should be undoable is a named [`Command`].
//! Invoking a command computes a [`Transition`] (the before/after pair),
//! applies it once, and, for queued commands, records it on a linear
//! history:
//! - a new entry discards everything after the current position
//! - undo steps back one entry, redo steps forward one entry
//! - exhausting either end is silently ignored

mod builtin;

pub use builtin::{
    CommandName, Delete, DragCommand, PlaceBottom, PlaceTop, Stack, UpdateBlock, UpdateContainer,
    restack,
};

use crate::bus::EventBus;
use crate::document::{Block, Document, DocumentModel};
use crate::error::{EditorError, EditorResult};
use crate::input::KeyEvent;
use crate::shortcuts::{Chord, Keymap};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

/// The `{redo, undo}` pair produced by a command.
///
/// Both sides are complete documents, so undo restores the pre-command
/// value exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub before: Rc<Document>,
    pub after: Rc<Document>,
}

impl Transition {
    pub fn new(before: Rc<Document>, after: impl Into<Rc<Document>>) -> Self {
        Self {
            before,
            after: after.into(),
        }
    }

    pub(crate) fn redo(&self, model: &DocumentModel) {
        model.publish(Rc::clone(&self.after));
    }

    pub(crate) fn undo(&self, model: &DocumentModel) {
        model.publish(Rc::clone(&self.before));
    }
}

/// Arguments passed to [`Command::execute`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommandArgs {
    #[default]
    None,
    /// A whole replacement document.
    Document(Document),
    /// A replacement for the block at `index`.
    Block { index: usize, block: Block },
}

/// Closure run when the engine is disposed.
pub type Teardown = Box<dyn FnOnce()>;

/// Deferred invocations posted by listeners that cannot borrow the engine.
#[derive(Clone, Default)]
pub struct Mailbox {
    pending: Rc<RefCell<VecDeque<(String, CommandArgs)>>>,
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}

impl Mailbox {
    pub fn post(&self, name: impl Into<String>, args: CommandArgs) {
        self.pending.borrow_mut().push_back((name.into(), args));
    }

    fn pop(&self) -> Option<(String, CommandArgs)> {
        self.pending.borrow_mut().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Handles given to [`Command::init`] for installing persistent listeners.
pub struct InitContext<'a> {
    pub bus: &'a EventBus,
    pub model: &'a DocumentModel,
    pub mailbox: &'a Mailbox,
}

/// A named, reversible document mutation.
pub trait Command {
    fn name(&self) -> &str;

    /// Whether the transition is recorded for undo.
    fn push_queue(&self) -> bool {
        true
    }

    fn shortcut(&self) -> Option<Chord> {
        None
    }

    /// Install persistent listeners. The returned closure removes them.
    fn init(&mut self, _ctx: &InitContext<'_>) -> Option<Teardown> {
        None
    }

    /// Compute the transition against the current document.
    /// `Ok(None)` means there is nothing to do.
    fn execute(&mut self, args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>>;
}

#[derive(Debug, Clone)]
struct HistoryEntry {
    name: String,
    transition: Transition,
}

/// Names handled by the engine itself rather than by a registered command.
const INTRINSIC: [CommandName; 2] = [CommandName::Undo, CommandName::Redo];

/// Linear undo/redo history plus the command registry and keymap.
pub struct CommandHistory {
    model: DocumentModel,
    bus: EventBus,
    mailbox: Mailbox,
    commands: Vec<Box<dyn Command>>,
    by_name: HashMap<String, usize>,
    queue: Vec<HistoryEntry>,
    /// Position of the last applied entry; `None` is before the first one.
    current: Option<usize>,
    limit: Option<usize>,
    keymap: Keymap,
    keyboard_attached: bool,
    teardowns: Vec<Teardown>,
}

impl fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("commands", &self.by_name.keys().collect::<Vec<_>>())
            .field("queue", &self.queue.len())
            .field("current", &self.current)
            .field("keyboard_attached", &self.keyboard_attached)
            .finish()
    }
}

impl CommandHistory {
    /// Create an engine without any registered commands.
    pub fn empty(model: DocumentModel, bus: EventBus) -> Self {
        let mut keymap = Keymap::new();
        for (chord, name) in [("ctrl+z", CommandName::Undo), ("ctrl+y", CommandName::Redo)] {
            if let Err(e) = keymap.bind(Chord::parse(chord), name.as_str()) {
                log::error!("failed to bind built-in shortcut: {}", e);
            }
        }
        Self {
            model,
            bus,
            mailbox: Mailbox::default(),
            commands: Vec::new(),
            by_name: HashMap::new(),
            queue: Vec::new(),
            current: None,
            limit: None,
            keymap,
            keyboard_attached: true,
            teardowns: Vec::new(),
        }
    }

    /// Create an engine with the built-in commands registered.
    pub fn new(model: DocumentModel, bus: EventBus) -> Self {
        let mut history = Self::empty(model, bus);
        let builtins: Vec<Box<dyn Command>> = vec![
            Box::new(DragCommand::default()),
            Box::new(UpdateContainer),
            Box::new(UpdateBlock),
            Box::new(PlaceTop),
            Box::new(PlaceBottom),
            Box::new(Delete),
        ];
        for command in builtins {
            // Built-in names are distinct by construction.
            if let Err(e) = history.register(command) {
                log::error!("failed to register built-in command: {}", e);
            }
        }
        history
    }

    /// Cap the number of recorded entries. The oldest are dropped first.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self.enforce_limit();
        self
    }

    /// Register a command, bind its shortcut, and run its `init`.
    ///
    /// Names and chords must be unique; a rejected command is never
    /// initialised.
    pub fn register(&mut self, mut command: Box<dyn Command>) -> EditorResult<()> {
        let name = command.name().to_string();
        if self.is_registered(&name) {
            return Err(EditorError::DuplicateCommand(name));
        }

        if let Some(chord) = command.shortcut() {
            self.keymap.bind(chord, name.clone())?;
        }
        let ctx = InitContext {
            bus: &self.bus,
            model: &self.model,
            mailbox: &self.mailbox,
        };
        if let Some(teardown) = command.init(&ctx) {
            self.teardowns.push(teardown);
        }

        log::debug!("registered command '{}'", name);
        self.by_name.insert(name, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.by_name.contains_key(name) || INTRINSIC.iter().any(|n| n.as_str() == name)
    }

    /// Invoke a command by name. Returns whether the document changed hands.
    pub fn invoke(&mut self, name: &str, args: CommandArgs) -> EditorResult<bool> {
        match name.parse::<CommandName>() {
            Ok(CommandName::Undo) => return Ok(self.undo()),
            Ok(CommandName::Redo) => return Ok(self.redo()),
            _ => {}
        }

        let Some(&slot) = self.by_name.get(name) else {
            log::warn!("invoke of unregistered command '{}'", name);
            return Err(EditorError::UnknownCommand(name.to_string()));
        };
        let command = &mut self.commands[slot];
        let document = self.model.current();
        let Some(transition) = command.execute(args, &document)? else {
            log::debug!("command '{}' had nothing to do", name);
            return Ok(false);
        };
        let push_queue = command.push_queue();

        transition.redo(&self.model);
        if push_queue {
            self.push(name, transition);
        }
        log::debug!("command '{}' applied (history {:?}/{})", name, self.current, self.queue.len());
        Ok(true)
    }

    fn push(&mut self, name: &str, transition: Transition) {
        let keep = self.current.map_or(0, |c| c + 1);
        self.queue.truncate(keep);
        self.queue.push(HistoryEntry {
            name: name.to_string(),
            transition,
        });
        self.current = Some(self.queue.len() - 1);
        self.enforce_limit();
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.limit else { return };
        if self.queue.len() <= limit {
            return;
        }
        let overflow = self.queue.len() - limit;
        self.queue.drain(..overflow);
        self.current = self
            .current
            .and_then(|c| c.checked_sub(overflow));
    }

    /// Publish a document without recording it. Used for state that is
    /// either transient (focus, live drag positions, layout feedback) or
    /// captured later by a gesture-level command.
    pub(crate) fn publish_transient(&self, document: Document) {
        self.model.publish(document);
    }

    /// Step back one entry. Returns false at the bottom of the history.
    pub fn undo(&mut self) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let entry = &self.queue[current];
        log::debug!("undo '{}'", entry.name);
        entry.transition.undo(&self.model);
        self.current = current.checked_sub(1);
        true
    }

    /// Step forward one entry. Returns false at the top of the history.
    pub fn redo(&mut self) -> bool {
        let next = self.current.map_or(0, |c| c + 1);
        let Some(entry) = self.queue.get(next) else {
            return false;
        };
        log::debug!("redo '{}'", entry.name);
        entry.transition.redo(&self.model);
        self.current = Some(next);
        true
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.current.map_or(0, |c| c + 1) < self.queue.len()
    }

    /// Index of the last applied entry, `None` before the first.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Number of recorded entries, including undone ones.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Names of the recorded entries, oldest first.
    pub fn entry_names(&self) -> Vec<&str> {
        self.queue.iter().map(|e| e.name.as_str()).collect()
    }

    /// Dispatch a key press. Returns true when a shortcut matched, in which
    /// case the platform default action should be suppressed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        if !self.keyboard_attached {
            return false;
        }
        let Some(name) = self.keymap.resolve(event).map(str::to_string) else {
            return false;
        };
        if let Err(e) = self.invoke(&name, CommandArgs::None) {
            log::warn!("shortcut for '{}' failed: {}", name, e);
        }
        self.run_deferred();
        true
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    /// Invoke everything listeners posted since the last call.
    /// Returns how many invocations ran.
    pub fn run_deferred(&mut self) -> usize {
        let mut ran = 0;
        while let Some((name, args)) = self.mailbox.pop() {
            if let Err(e) = self.invoke(&name, args) {
                log::warn!("deferred '{}' failed: {}", name, e);
            }
            ran += 1;
        }
        ran
    }

    pub fn is_disposed(&self) -> bool {
        !self.keyboard_attached
    }

    /// Detach keyboard dispatch and run every teardown. Idempotent.
    pub fn dispose(&mut self) {
        if !self.keyboard_attached && self.teardowns.is_empty() {
            return;
        }
        self.keyboard_attached = false;
        for teardown in self.teardowns.drain(..) {
            teardown();
        }
        log::info!("command history disposed");
    }
}

impl Drop for CommandHistory {
    fn drop(&mut self) {
        self.dispose();
    }
}
