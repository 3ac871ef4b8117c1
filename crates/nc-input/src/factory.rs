//! Runtime handler registry.
//!
//! Handler families are looked up by name at configuration-load time, so
//! a new adapter is added by registering a constructor, not by editing a
//! central switch.

use crate::handler::InputHandler;
use crate::spec::parse_input_spec;
use nc_core::{Error, Result};
use nc_io::{records, SampleFile};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Constructor signature for one handler family.
pub type HandlerConstructor = fn(&str, &[PathBuf]) -> Result<Box<dyn InputHandler>>;

/// Registry of handler constructors keyed by family name.
pub struct InputFactory {
    registry: BTreeMap<String, HandlerConstructor>,
}

impl Default for InputFactory {
    fn default() -> Self {
        Self::new()
    }
}

fn neut_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::neut::NeutInput::open(handle, files)?))
}
fn genie_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::genie::GenieInput::open(handle, files)?))
}
fn nuwro_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::nuwro::NuwroInput::open(handle, files)?))
}
fn gibuu_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::gibuu::GibuuInput::open(handle, files)?))
}
fn nuance_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::nuance::NuanceInput::open(handle, files)?))
}
fn hepmc_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::hepmc::HepmcInput::open(handle, files)?))
}
fn flat_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::flat::FlatInput::open(handle, files)?))
}
fn spline_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::spline::SplineInput::open(handle, files)?))
}
fn histo_ctor(handle: &str, files: &[PathBuf]) -> Result<Box<dyn InputHandler>> {
    Ok(Box::new(crate::histo::HistoInput::open(handle, files)?))
}

impl InputFactory {
    /// Registry pre-populated with the built-in handler families.
    pub fn new() -> Self {
        let mut f = Self { registry: BTreeMap::new() };
        f.register("NEUT", neut_ctor);
        f.register("GENIE", genie_ctor);
        f.register("NUWRO", nuwro_ctor);
        f.register("GIBUU", gibuu_ctor);
        f.register("NUANCE", nuance_ctor);
        f.register("HEPMC", hepmc_ctor);
        f.register("FEVENT", flat_ctor);
        f.register("EVSPLN", spline_ctor);
        f.register("HISTO", histo_ctor);
        f
    }

    /// Register (or replace) a handler family.
    pub fn register(&mut self, name: impl Into<String>, ctor: HandlerConstructor) {
        self.registry.insert(name.into().to_ascii_uppercase(), ctor);
    }

    /// Registered family names.
    pub fn types(&self) -> Vec<&str> {
        self.registry.keys().map(String::as_str).collect()
    }

    /// Build a handler from a raw input descriptor.
    ///
    /// Without a `TYPE:` prefix the family is guessed by probing the first
    /// file's key list for a reserved tree name.
    pub fn create(&self, handle: &str, raw: &str) -> Result<Box<dyn InputHandler>> {
        let spec = parse_input_spec(raw)?;
        let ty = match spec.handler_type {
            Some(ty) => ty,
            None => guess_input_type(&spec.files[0])?,
        };
        let ctor = self.registry.get(&ty).ok_or_else(|| {
            Error::Config(format!(
                "no input handler registered for type '{ty}' (known: {})",
                self.types().join(", ")
            ))
        })?;
        ctor(handle, &spec.files)
    }
}

/// Guess a handler family from a file's reserved tree names.
pub fn guess_input_type(path: &Path) -> Result<String> {
    let file = SampleFile::open(path)?;
    let probes: [(&str, &str); 7] = [
        (records::neut::TREE_NAME, "NEUT"),
        (records::nuwro::TREE_NAME, "NUWRO"),
        (records::genie::TREE_NAME, "GENIE"),
        (records::gibuu::TREE_NAME, "GIBUU"),
        (records::nuance::TREE_NAME, "NUANCE"),
        (records::hepmc::TREE_NAME, "HEPMC"),
        (records::flat::TREE_NAME, "FEVENT"),
    ];
    for (tree, ty) in probes {
        if file.has_key(tree) {
            // A canonical tree with a spline block alongside is a spline
            // input, not a plain flat one.
            if ty == "FEVENT" && file.has_key(records::flat::SPLINE_TREE_NAME) {
                return Ok("EVSPLN".into());
            }
            return Ok(ty.into());
        }
    }
    Err(Error::Config(format!(
        "couldn't determine input type from file '{}'",
        path.display()
    )))
}
