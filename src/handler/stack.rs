//! The parse-context stack.
//!
//! One [`Frame`] per open tag. A frame records the tag, the entity of the innermost enclosing
//! type-entry tag, what the frame is currently building ([`Payload`]) and, for the document root
//! and every type-entry frame, the [`TransientMods`] buffer that is committed when the frame closes.
//!
//! Payloads address records by position (`owner` frame index plus list indices) rather than by
//! "the last element of the list", so a directive always lands on the record its parent opened.

use typesys_core::lang::tags::TagId;

use crate::model::{
    AddedField, AddedFunction, CodeSnip, CustomFunction, DocModification, FieldModification, FunctionModification,
    TemplateEntry, TemplateInstance, TypeEntryId,
};

/// Modification lists accumulated for one entity while its tag is open.
#[derive(Debug, Default)]
pub(crate) struct TransientMods {
    pub added_functions: Vec<AddedFunction>,
    pub function_mods: Vec<FunctionModification>,
    pub field_mods: Vec<FieldModification>,
    pub added_fields: Vec<AddedField>,
    pub code_snips: Vec<CodeSnip>,
    pub doc_modifications: Vec<DocModification>,
}

/// Where an open code snippet lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SnipTarget {
    /// `code_snips[index]` of the owner's buffer (root or complex entity).
    Entity { owner: usize, index: usize },
    /// `function_mods[function].snips[snip]` of the owner's buffer.
    Function { owner: usize, function: usize, snip: usize },
}

/// What an open frame is building.
#[derive(Debug)]
pub(crate) enum Payload {
    None,
    Template(TemplateEntry),
    TemplateInstance(TemplateInstance),
    CustomFunction(CustomFunction),
    /// `function_mods[index]` of the owner's buffer.
    Function { owner: usize, index: usize },
    /// `function_mods[function].argument_mods[argument]`.
    Argument { owner: usize, function: usize, argument: usize },
    /// A conversion rule of an argument modification.
    ArgumentConversion {
        owner: usize,
        function: usize,
        argument: usize,
        rule: usize,
    },
    /// `field_mods[index]` of the owner's buffer.
    Field { owner: usize, index: usize },
    /// `modify-field` without a name: children have nothing to modify.
    SkippedField,
    /// `added_fields[index]` of the owner's buffer.
    AddedField { owner: usize, index: usize },
    Snip(SnipTarget),
    /// `doc_modifications[index]` of the owner's buffer.
    Documentation { owner: usize, index: usize },
}

#[derive(Debug)]
pub(crate) struct Frame {
    pub tag: TagId,
    pub entry: Option<TypeEntryId>,
    pub payload: Payload,
    /// Present on the root and on type-entry frames.
    pub mods: Option<TransientMods>,
}

impl Frame {
    pub fn new(tag: TagId, entry: Option<TypeEntryId>) -> Self {
        Self {
            tag,
            entry,
            payload: Payload::None,
            mods: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_mods(mut self) -> Self {
        self.mods = Some(TransientMods::default());
        self
    }
}

#[derive(Debug, Default)]
pub(crate) struct ParseStack {
    frames: Vec<Frame>,
}

impl ParseStack {
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn top_tag(&self) -> Option<TagId> {
        self.top().map(|f| f.tag)
    }

    /// Entity of the innermost type-entry frame.
    pub fn current_entry(&self) -> Option<TypeEntryId> {
        self.top().and_then(|f| f.entry)
    }

    /// Index of the innermost frame owning a modification buffer.
    pub fn owner_index(&self) -> Option<usize> {
        self.frames.iter().rposition(|f| f.mods.is_some())
    }

    pub fn mods_mut(&mut self, owner: usize) -> Option<&mut TransientMods> {
        self.frames.get_mut(owner).and_then(|f| f.mods.as_mut())
    }

    pub fn function_mut(&mut self, owner: usize, index: usize) -> Option<&mut FunctionModification> {
        self.mods_mut(owner).and_then(|m| m.function_mods.get_mut(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_is_the_innermost_buffer() {
        let mut stack = ParseStack::default();
        stack.push(Frame::new(TagId::Root, Some(0)).with_mods());
        assert_eq!(stack.owner_index(), Some(0));
        stack.push(Frame::new(TagId::ValueType, Some(1)).with_mods());
        stack.push(Frame::new(TagId::ModifyFunction, Some(1)));
        assert_eq!(stack.owner_index(), Some(1));
        assert_eq!(stack.current_entry(), Some(1));
        stack.pop();
        stack.pop();
        assert_eq!(stack.owner_index(), Some(0));
    }
}
