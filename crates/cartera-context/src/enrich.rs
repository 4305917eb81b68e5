//! Append the client dataset to a conversation's system prompt.

use std::sync::Arc;

use cartera_core::{Record, RecordStore};

use crate::{
  aggregator::Aggregator,
  display::{RECORD_SEPARATOR, render},
  message::{ChatMessage, Role},
};

const INSTRUCTIONS: &str = "Usa esta información cuando el usuario pregunte sobre clientes, \
lotes, desarrollos, estatus de pagos, deudas, información de contacto o cualquier tema \
relacionado. Si el usuario pregunta por algo específico que está en esta base de datos, \
úsala para responder de manera precisa y actualizada.";

/// Injects rendered client records into outgoing chat requests.
pub struct ContextEnricher<S> {
  aggregator:      Arc<Aggregator<S>>,
  max_block_chars: Option<usize>,
}

impl<S: RecordStore> ContextEnricher<S> {
  pub fn new(aggregator: Arc<Aggregator<S>>) -> Self {
    Self { aggregator, max_block_chars: None }
  }

  /// Cap the rendered record body at `limit` characters. Whole records are
  /// dropped from the end until the rest fits.
  pub fn with_max_block_chars(mut self, limit: Option<usize>) -> Self {
    self.max_block_chars = limit;
    self
  }

  /// Return `messages` with the knowledge block appended to the first system
  /// message.
  ///
  /// Never fails. A store that cannot be read contributes no records; with
  /// no system message or no records at all the conversation comes back
  /// unchanged.
  pub async fn enrich(&self, mut messages: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let Some(system) = messages.iter().position(|m| m.role == Role::System) else {
      return messages;
    };

    let records = self.aggregator.all_records().await;

    if let Some(block) = knowledge_block(&records, self.max_block_chars) {
      tracing::debug!(records = records.len(), chars = block.len(), "enriched system prompt");
      messages[system].content.push_str(&block);
    }
    messages
  }
}

/// The text appended to the system prompt, or `None` when there are no
/// records.
///
/// Records that do not fit `max_chars` are counted in an omission note, so
/// the block is emitted even when not a single record fits.
pub fn knowledge_block(records: &[Record], max_chars: Option<usize>) -> Option<String> {
  if records.is_empty() {
    return None;
  }

  let mut body = String::new();
  let mut body_chars = 0usize;
  let mut included = 0usize;

  for rendered in records.iter().map(render) {
    let sep = if included == 0 { "" } else { RECORD_SEPARATOR };
    let added = sep.chars().count() + rendered.chars().count();
    if max_chars.is_some_and(|max| body_chars + added > max) {
      break;
    }
    body.push_str(sep);
    body.push_str(&rendered);
    body_chars += added;
    included += 1;
  }

  let omitted = records.len() - included;
  let mut block =
    format!("\n\n*BASE DE DATOS DE CLIENTES ({included} registros):*\n\n{body}");
  if omitted > 0 {
    if included > 0 {
      block.push_str("\n\n");
    }
    block.push_str(&format!("({omitted} registros omitidos por límite de contexto)"));
  }
  block.push_str("\n\n");
  block.push_str(INSTRUCTIONS);
  Some(block)
}
