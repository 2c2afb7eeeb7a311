/*
This code is part of the GeoVec vector editing and overlay library.
License: MIT
*/
use crate::edit::{Feature, ObjectId};

/// One undoable step: the staged state of a single feature before and after
/// an edit. `None` on either side means the feature wasn't staged at that
/// point.
#[derive(Debug, Clone)]
pub struct EditCommand {
    pub source: String,
    pub id: ObjectId,
    pub before: Option<Feature>,
    pub after: Option<Feature>,
}

/// A bounded undo/redo stack of value deltas. Pushing a new command while
/// the cursor is rewound discards the redo branch, as any editor would.
#[derive(Debug, Default, Clone)]
pub struct UndoStack {
    commands: Vec<EditCommand>,
    cursor: usize,
    max_depth: usize,
}

impl UndoStack {
    pub fn new(max_depth: usize) -> UndoStack {
        UndoStack {
            commands: vec![],
            cursor: 0,
            max_depth,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.commands.len()
    }

    pub fn push(&mut self, command: EditCommand) {
        self.commands.truncate(self.cursor);
        if self.max_depth > 0 && self.commands.len() == self.max_depth {
            self.commands.remove(0);
        } else {
            self.cursor += 1;
        }
        self.commands.push(command);
    }

    /// Steps the cursor back and hands out the command to replay in the
    /// `before` direction.
    pub fn undo(&mut self) -> Option<&EditCommand> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.commands[self.cursor])
    }

    /// Steps the cursor forward and hands out the command to replay in the
    /// `after` direction.
    pub fn redo(&mut self) -> Option<&EditCommand> {
        if self.cursor == self.commands.len() {
            return None;
        }
        let command = &self.commands[self.cursor];
        self.cursor += 1;
        Some(command)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.cursor = 0;
    }
}
