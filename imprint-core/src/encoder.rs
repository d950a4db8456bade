use std::borrow::Cow;

use crate::classify::Classifier;
use crate::error::{ImprintError, Position};
use crate::guard::CycleGuard;
use crate::imprint::Imprint;
use crate::kind::Tag;
use crate::options::{Options, StringFraming};
use crate::order::canonical_order;
use crate::sink::{RecordingSink, Sink, SinkError};
use crate::view::View;

/// Writes the canonical encoding of values into a sink.
///
/// An encoder owns the cycle guard for one computation: references entered
/// through one encoder are skipped on later occurrences.
pub struct Encoder<'s, S: Sink + ?Sized> {
    sink: &'s mut S,
    guard: CycleGuard,
    classifier: Classifier,
    options: Options,
}

impl<'s, S: Sink + ?Sized> Encoder<'s, S> {
    pub fn new(sink: &'s mut S, options: Options) -> Self {
        Encoder {
            sink,
            guard: CycleGuard::new(),
            classifier: Classifier::new(options.max_depth),
            options,
        }
    }

    /// Appends the encoding of `value` to the sink.
    pub fn encode(&mut self, value: &dyn Imprint) -> Result<(), ImprintError> {
        self.encode_at(value, 0)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), ImprintError> {
        let written = self.sink.write(bytes)?;
        if written != bytes.len() {
            return Err(SinkError(format!("short write: {} of {} bytes", written, bytes.len())).into());
        }
        Ok(())
    }

    fn write_tag(&mut self, tag: Tag) -> Result<(), ImprintError> {
        self.write(&[tag.byte()])
    }

    fn write_text(&mut self, text: &str) -> Result<(), ImprintError> {
        if self.options.string_framing == StringFraming::LengthPrefixed {
            self.write(&(text.len() as u64).to_le_bytes())?;
        }
        self.write(text.as_bytes())
    }

    fn encode_at(&mut self, value: &dyn Imprint, depth: usize) -> Result<(), ImprintError> {
        self.classifier.check_depth(value, depth)?;

        match value.view() {
            View::Reference(reference) => match self.classifier.follow(&reference, &mut self.guard) {
                Some(target) => self.encode_at(target, depth + 1),
                None => Ok(()),
            },
            View::Nil(pointee) => match pointee {
                Some(name) => {
                    self.write_tag(Tag::Nil)?;
                    self.write(name.as_bytes())
                }
                None => Ok(()),
            },
            View::Unsigned(ty, v) => {
                self.write_tag(ty.tag())?;
                self.write(&v.to_le_bytes())
            }
            View::Signed(ty, v) => {
                self.write_tag(ty.tag())?;
                self.write(&v.to_le_bytes())
            }
            View::Float(ty, v) => {
                self.write_tag(ty.tag())?;
                self.write(&v.to_le_bytes())
            }
            View::Complex(ty, re, im) => {
                self.write_tag(ty.complex_tag())?;
                self.write(&re.to_le_bytes())?;
                self.write(&im.to_le_bytes())
            }
            View::Bool(b) => {
                self.write_tag(Tag::Bool)?;
                self.write(&[u8::from(b)])
            }
            View::Str(s) => {
                self.write_tag(Tag::Str)?;
                self.write_text(s)
            }
            View::Rendered(text) => {
                self.write_tag(Tag::Rendered)?;
                self.write_text(&value.type_name())?;
                self.write_text(&text)
            }
            View::Sequence(elements) => {
                if elements.is_empty() {
                    return self.write(value.type_name().as_bytes());
                }
                self.write_tag(Tag::Sequence)?;
                for (i, element) in elements.iter().enumerate() {
                    self.encode_at(&**element, depth + 1)
                        .map_err(|e| e.at(Position::Element(i)))?;
                }
                Ok(())
            }
            View::Mapping(entries) => {
                if entries.is_empty() {
                    return self.write(value.type_name().as_bytes());
                }
                let entries = canonical_order(entries, &self.options)?;
                self.write_tag(Tag::Mapping)?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    self.encode_at(&**k, depth + 1).map_err(|e| e.at(Position::Key(i)))?;
                    self.encode_at(&**v, depth + 1).map_err(|e| e.at(Position::Value(i)))?;
                }
                Ok(())
            }
            View::Aggregate(aggregate) => {
                self.write(aggregate.name.as_bytes())?;
                self.write(aggregate.namespace.as_bytes())?;
                if aggregate.fields.is_empty() {
                    return Ok(());
                }
                self.write_tag(Tag::Aggregate)?;
                for field in &aggregate.fields {
                    self.encode_at(&*field.value, depth + 1)
                        .map_err(|e| e.at(Position::Field(field.name.to_string())))?;
                }
                Ok(())
            }
            View::Unsupported(reason) => Err(unsupported(value.type_name(), reason)),
        }
    }
}

fn unsupported(type_name: Cow<'_, str>, reason: Cow<'_, str>) -> ImprintError {
    tracing::debug!(%type_name, %reason, "unsupported value");
    ImprintError::UnsupportedType {
        type_name: type_name.into_owned(),
        reason: reason.into_owned(),
    }
}

/// Returns the canonical encoding of `value` on its own, with a fresh cycle guard.
pub(crate) fn render(value: &dyn Imprint, options: &Options) -> Result<Vec<u8>, ImprintError> {
    let mut sink = RecordingSink::new();
    Encoder::new(&mut sink, options.clone()).encode(value)?;
    Ok(sink.into_vec())
}
