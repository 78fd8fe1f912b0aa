//! Character data routing.

use super::Handler;
use super::stack::{Payload, SnipTarget};
use crate::model::{CodeBuffer, Modifiers};

/// A code body addressed by position inside the stack.
#[derive(Debug, Clone, Copy)]
enum CodeTarget {
    /// Held by the top frame itself.
    Frame,
    Conversion {
        owner: usize,
        function: usize,
        argument: usize,
        rule: usize,
    },
    Snip(SnipTarget),
    Documentation {
        owner: usize,
        index: usize,
    },
}

impl Handler<'_> {
    /// Route a text run to whatever the innermost frame is building; otherwise discard it.
    pub(super) fn route_text(&mut self, text: &str) {
        let payload = self.stack.top().map(|f| &f.payload);
        match payload {
            Some(Payload::AddedField { owner, index }) => {
                let (owner, index) = (*owner, *index);
                if let Some(field) = self.stack.mods_mut(owner).and_then(|m| m.added_fields.get_mut(index)) {
                    field.default_value.push_str(text);
                }
                return;
            }
            Some(Payload::Snip(SnipTarget::Function { owner, function, .. })) => {
                let (owner, function) = (*owner, *function);
                if let Some(m) = self.stack.function_mut(owner, function) {
                    m.modifiers |= Modifiers::CODE_INJECTION;
                }
            }
            _ => {}
        }
        if let Some(code) = self.active_code() {
            code.add_text(text);
        }
    }

    /// Code body of the top frame: template, custom function, argument conversion rule,
    /// code snippet or documentation.
    pub(super) fn active_code(&mut self) -> Option<&mut CodeBuffer> {
        let target = match &self.stack.top()?.payload {
            Payload::Template(_) | Payload::CustomFunction(_) => CodeTarget::Frame,
            Payload::ArgumentConversion {
                owner,
                function,
                argument,
                rule,
            } => CodeTarget::Conversion {
                owner: *owner,
                function: *function,
                argument: *argument,
                rule: *rule,
            },
            Payload::Snip(snip) => CodeTarget::Snip(*snip),
            Payload::Documentation { owner, index } => CodeTarget::Documentation {
                owner: *owner,
                index: *index,
            },
            _ => return None,
        };

        match target {
            CodeTarget::Frame => match &mut self.stack.top_mut()?.payload {
                Payload::Template(template) => Some(&mut template.code),
                Payload::CustomFunction(function) => Some(&mut function.code),
                _ => None,
            },
            CodeTarget::Conversion {
                owner,
                function,
                argument,
                rule,
            } => self
                .stack
                .function_mut(owner, function)?
                .argument_mods
                .get_mut(argument)?
                .conversion_rules
                .get_mut(rule)
                .map(|r| &mut r.code),
            CodeTarget::Snip(SnipTarget::Entity { owner, index }) => self
                .stack
                .mods_mut(owner)?
                .code_snips
                .get_mut(index)
                .map(|s| &mut s.code),
            CodeTarget::Snip(SnipTarget::Function { owner, function, snip }) => self
                .stack
                .function_mut(owner, function)?
                .snips
                .get_mut(snip)
                .map(|s| &mut s.code),
            CodeTarget::Documentation { owner, index } => self
                .stack
                .mods_mut(owner)?
                .doc_modifications
                .get_mut(index)
                .map(|d| &mut d.code),
        }
    }
}
