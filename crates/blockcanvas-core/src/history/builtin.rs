//! Built-in editor commands.

use super::{Command, CommandArgs, InitContext, Teardown, Transition};
use crate::bus::DragSignal;
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::selection::FocusSplit;
use crate::shortcuts::Chord;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Names of the commands every editor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Undo,
    Redo,
    Drag,
    UpdateContainer,
    UpdateBlock,
    PlaceTop,
    PlaceBottom,
    Delete,
}

impl CommandName {
    pub const ALL: [CommandName; 8] = [
        CommandName::Undo,
        CommandName::Redo,
        CommandName::Drag,
        CommandName::UpdateContainer,
        CommandName::UpdateBlock,
        CommandName::PlaceTop,
        CommandName::PlaceBottom,
        CommandName::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CommandName::Undo => "undo",
            CommandName::Redo => "redo",
            CommandName::Drag => "drag",
            CommandName::UpdateContainer => "updateContainer",
            CommandName::UpdateBlock => "updateBlock",
            CommandName::PlaceTop => "placeTop",
            CommandName::PlaceBottom => "placeBottom",
            CommandName::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandName {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EditorError::UnknownCommand(s.to_string()))
    }
}

/// Records one history entry per drag gesture.
///
/// Snapshots the document when the bus reports a drag start, and commits
/// the difference once the matching end arrives.
#[derive(Default)]
pub struct DragCommand {
    before: Rc<RefCell<Option<Rc<Document>>>>,
}

impl Command for DragCommand {
    fn name(&self) -> &str {
        CommandName::Drag.as_str()
    }

    fn init(&mut self, ctx: &InitContext<'_>) -> Option<Teardown> {
        let before = Rc::clone(&self.before);
        let model = ctx.model.clone();
        let start = ctx.bus.subscribe(DragSignal::Start, move || {
            *before.borrow_mut() = Some(model.current());
        });

        let mailbox = ctx.mailbox.clone();
        let end = ctx.bus.subscribe(DragSignal::End, move || {
            mailbox.post(CommandName::Drag.as_str(), CommandArgs::None);
        });

        let bus = ctx.bus.clone();
        Some(Box::new(move || {
            bus.unsubscribe(start);
            bus.unsubscribe(end);
        }))
    }

    fn execute(&mut self, _args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        let Some(before) = self.before.borrow_mut().take() else {
            log::debug!("drag end without a matching start");
            return Ok(None);
        };
        if *before == **document {
            return Ok(None);
        }
        Ok(Some(Transition::new(before, Rc::clone(document))))
    }
}

/// Replace the whole document (import, container resize).
pub struct UpdateContainer;

impl Command for UpdateContainer {
    fn name(&self) -> &str {
        CommandName::UpdateContainer.as_str()
    }

    fn execute(&mut self, args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        let CommandArgs::Document(next) = args else {
            return Err(EditorError::InvalidArguments(self.name().to_string()));
        };
        Ok(Some(Transition::new(Rc::clone(document), next)))
    }
}

/// Replace one block, identified by its position in the sequence.
pub struct UpdateBlock;

impl Command for UpdateBlock {
    fn name(&self) -> &str {
        CommandName::UpdateBlock.as_str()
    }

    fn execute(&mut self, args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        let CommandArgs::Block { index, block } = args else {
            return Err(EditorError::InvalidArguments(self.name().to_string()));
        };
        if index >= document.len() {
            log::warn!("updateBlock: no block at index {}", index);
            return Ok(None);
        }
        let mut blocks = document.blocks.clone();
        blocks[index] = block;
        Ok(Some(Transition::new(Rc::clone(document), document.with_blocks(blocks))))
    }
}

/// Direction for [`restack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stack {
    Top,
    Bottom,
}

/// Re-rank focused blocks above or below every unfocused block.
///
/// Returns `None` when there is nothing to rank (no focused blocks) or
/// nothing to rank against (no unfocused blocks). Sending to the bottom
/// never leaves a negative z-index: if the target would go below zero the
/// unfocused blocks are shifted up by the deficit first. A z-index that
/// would leave the `i64` range also makes the call a no-op.
pub fn restack(document: &Document, stack: Stack) -> Option<Document> {
    let split = FocusSplit::of(document);
    if !split.has_focus() || split.unfocused.is_empty() {
        return None;
    }
    let focused = split.focused_indices();
    let unfocused: Vec<usize> = split.unfocused.iter().map(|(i, _)| *i).collect();
    let mut blocks = document.blocks.clone();

    let target = match stack {
        Stack::Top => {
            let max = split.unfocused_blocks().map(|b| b.z_index).max()?;
            max.checked_add(1)
        }
        Stack::Bottom => {
            let min = split.unfocused_blocks().map(|b| b.z_index).min()?;
            match min.checked_sub(1) {
                Some(target) if target < 0 => target.checked_neg().and_then(|deficit| {
                    unfocused
                        .iter()
                        .try_for_each(|&i| {
                            blocks[i].z_index = blocks[i].z_index.checked_add(deficit)?;
                            Some(())
                        })
                        .map(|()| 0)
                }),
                other => other,
            }
        }
    };
    let Some(target) = target else {
        log::warn!("z-index out of range, {:?} skipped", stack);
        return None;
    };

    for i in focused {
        blocks[i].z_index = target;
    }
    Some(document.with_blocks(blocks))
}

/// Bring focused blocks above everything else.
pub struct PlaceTop;

impl Command for PlaceTop {
    fn name(&self) -> &str {
        CommandName::PlaceTop.as_str()
    }

    fn execute(&mut self, _args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        Ok(restack(document, Stack::Top).map(|after| Transition::new(Rc::clone(document), after)))
    }
}

/// Send focused blocks below everything else.
pub struct PlaceBottom;

impl Command for PlaceBottom {
    fn name(&self) -> &str {
        CommandName::PlaceBottom.as_str()
    }

    fn execute(&mut self, _args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        Ok(restack(document, Stack::Bottom).map(|after| Transition::new(Rc::clone(document), after)))
    }
}

/// Remove every focused block in one step.
pub struct Delete;

impl Command for Delete {
    fn name(&self) -> &str {
        CommandName::Delete.as_str()
    }

    fn shortcut(&self) -> Option<Chord> {
        Some(Chord::parse("ctrl+delete"))
    }

    fn execute(&mut self, _args: CommandArgs, document: &Rc<Document>) -> EditorResult<Option<Transition>> {
        let split = FocusSplit::of(document);
        if !split.has_focus() {
            return Ok(None);
        }
        let remaining = split.unfocused_blocks().cloned().collect();
        Ok(Some(Transition::new(Rc::clone(document), document.with_blocks(remaining))))
    }
}
