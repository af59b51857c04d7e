// crates/cmdgate-core/src/runtime/registry.rs
// ============================================================================
// Module: cmdgate Type Reader Registry
// Description: Registry mapping declared type tags to readers.
// Purpose: Resolve the converter for each parameter at registration time.
// Dependencies: crate::{core, interfaces, runtime::readers}
// ============================================================================

//! ## Overview
//! The registry is populated before any command is registered and is only
//! read afterwards. Enumeration tags without an explicit registration fall
//! back to the enum reader; any other unregistered tag is unsupported.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::core::TypeTag;
use crate::interfaces::TypeReader;
use crate::runtime::readers::AttachmentReader;
use crate::runtime::readers::BooleanReader;
use crate::runtime::readers::ChannelReader;
use crate::runtime::readers::DecimalReader;
use crate::runtime::readers::EnumReader;
use crate::runtime::readers::FloatReader;
use crate::runtime::readers::GuildUserReader;
use crate::runtime::readers::IntegerReader;
use crate::runtime::readers::MentionableReader;
use crate::runtime::readers::RoleReader;
use crate::runtime::readers::TextReader;
use crate::runtime::readers::UrlReader;
use crate::runtime::readers::UserReader;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Type reader registry keyed by declared type tag.
pub struct TypeReaderRegistry {
    /// Readers keyed by tag.
    readers: HashMap<TypeTag, Arc<dyn TypeReader>>,
    /// Fallback reader for enumeration tags.
    enum_reader: Arc<dyn TypeReader>,
}

impl TypeReaderRegistry {
    /// Creates a registry with no readers and the default enum fallback.
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            enum_reader: Arc::new(EnumReader),
        }
    }

    /// Creates a registry with every built-in reader registered.
    #[must_use]
    pub fn with_builtin_readers() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_readers();
        registry
    }

    /// Registers the built-in readers, overriding existing registrations.
    pub fn register_builtin_readers(&mut self) {
        self.register(TypeTag::String, TextReader);
        self.register(TypeTag::I8, IntegerReader::I8);
        self.register(TypeTag::U8, IntegerReader::U8);
        self.register(TypeTag::I16, IntegerReader::I16);
        self.register(TypeTag::U16, IntegerReader::U16);
        self.register(TypeTag::I32, IntegerReader::I32);
        self.register(TypeTag::U32, IntegerReader::U32);
        self.register(TypeTag::I64, IntegerReader::I64);
        self.register(TypeTag::U64, IntegerReader::U64);
        self.register(TypeTag::F32, FloatReader::F32);
        self.register(TypeTag::F64, FloatReader::F64);
        self.register(TypeTag::Decimal, DecimalReader);
        self.register(TypeTag::Bool, BooleanReader);
        self.register(TypeTag::Url, UrlReader);
        self.register(TypeTag::User, UserReader);
        self.register(TypeTag::GuildUser, GuildUserReader);
        self.register(TypeTag::Role, RoleReader);
        self.register(TypeTag::Channel, ChannelReader);
        self.register(TypeTag::TextChannel, ChannelReader);
        self.register(TypeTag::VoiceChannel, ChannelReader);
        self.register(TypeTag::CategoryChannel, ChannelReader);
        self.register(TypeTag::Thread, ChannelReader);
        self.register(TypeTag::ForumChannel, ChannelReader);
        self.register(TypeTag::Mentionable, MentionableReader);
        self.register(TypeTag::Attachment, AttachmentReader);
    }

    /// Registers a reader, replacing any reader for the same tag.
    pub fn register(&mut self, tag: TypeTag, reader: impl TypeReader + 'static) {
        self.readers.insert(tag, Arc::new(reader));
    }

    /// Replaces the enumeration fallback reader.
    pub fn set_enum_reader(&mut self, reader: impl TypeReader + 'static) {
        self.enum_reader = Arc::new(reader);
    }

    /// Resolves the reader for a tag.
    ///
    /// Returns `None` when the tag is unsupported.
    #[must_use]
    pub fn resolve(&self, tag: TypeTag) -> Option<Arc<dyn TypeReader>> {
        if let Some(reader) = self.readers.get(&tag) {
            return Some(Arc::clone(reader));
        }
        match tag {
            TypeTag::Enum(_) => Some(Arc::clone(&self.enum_reader)),
            _ => None,
        }
    }

    /// Returns true when a reader is registered for the tag.
    #[must_use]
    pub fn contains(&self, tag: TypeTag) -> bool {
        self.readers.contains_key(&tag)
    }
}

impl Default for TypeReaderRegistry {
    fn default() -> Self {
        Self::with_builtin_readers()
    }
}

impl fmt::Debug for TypeReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<String> = self.readers.keys().map(ToString::to_string).collect();
        tags.sort();
        f.debug_struct("TypeReaderRegistry").field("tags", &tags).finish()
    }
}
