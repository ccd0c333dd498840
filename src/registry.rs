//! Load-time mapping from resource identifiers to their packed payloads.

use std::collections::BTreeMap;

use crate::{
    codec::reconstruct,
    foundation::{
        core::PixelBuffer,
        error::{RespackError, RespackResult},
    },
    pack::{ResourceKind, ResourceRecord, parse_header},
    render::{DisplaySurface, ImageLayout, LoadOptions, load_into_surface},
};

/// A packed resource as a consumer of the generated header sees it: sections already
/// concatenated, stages still applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedResource {
    pub name: String,
    pub kind: ResourceKind,
    /// Length after every stage is reversed.
    pub raw_length: usize,
    pub encoded: Vec<u8>,
}

impl EmbeddedResource {
    /// Reverse the transform stack.
    pub fn decode(&self) -> RespackResult<Vec<u8>> {
        Ok(reconstruct(&self.encoded, self.raw_length)?)
    }

    /// Pixel layout for image resources.
    pub fn layout(&self) -> Option<ImageLayout> {
        match self.kind {
            ResourceKind::Image {
                width,
                height,
                channels,
            } => Some(ImageLayout {
                width,
                height,
                channels,
            }),
            ResourceKind::File { .. } => None,
        }
    }

    /// Reverse the transform stack and wrap the result as pixels.
    pub fn pixels(&self) -> RespackResult<PixelBuffer> {
        let layout = self.layout().ok_or_else(|| {
            RespackError::layout(format!("resource '{}' is not an image", self.name))
        })?;
        PixelBuffer::new(layout.width, layout.height, layout.channels, self.decode()?)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    entries: BTreeMap<String, EmbeddedResource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from generated header text.
    pub fn from_header(text: &str) -> RespackResult<Self> {
        let mut registry = Self::new();
        for resource in parse_header(text)? {
            registry.insert(resource);
        }
        Ok(registry)
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ResourceRecord>) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.insert(record.to_embedded());
        }
        registry
    }

    /// Add or replace a resource; returns the previous entry under the same name.
    pub fn insert(&mut self, resource: EmbeddedResource) -> Option<EmbeddedResource> {
        self.entries.insert(resource.name.clone(), resource)
    }

    pub fn get(&self, name: &str) -> Option<&EmbeddedResource> {
        self.entries.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmbeddedResource> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original bytes of a resource.
    pub fn bytes(&self, name: &str) -> RespackResult<Vec<u8>> {
        self.lookup(name)?.decode()
    }

    /// Push an image resource onto the surface of the same name.
    pub fn show(
        &self,
        name: &str,
        surface: &mut dyn DisplaySurface,
        opts: LoadOptions,
    ) -> RespackResult<()> {
        let resource = self.lookup(name)?;
        let layout = resource.layout().ok_or_else(|| {
            RespackError::surface(format!("resource '{name}' is not an image"))
        })?;
        load_into_surface(surface, name, &resource.encoded, layout, opts)
    }

    fn lookup(&self, name: &str) -> RespackResult<&EmbeddedResource> {
        self.entries
            .get(name)
            .ok_or_else(|| RespackError::not_found(name))
    }
}
