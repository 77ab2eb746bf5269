// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory host for tests and offline development.
//!
//! [`SimHost`] implements [`Session`] and [`ScratchHost`] over a catalog,
//! a set of scripted programs and a scratch store, and records every
//! request it receives as a [`SimEvent`].

use crate::codec::{bin4, FieldCodec};
use crate::invoke::{Parameter, ParameterBlock, RECEIVER_HEADER_LEN};
use crate::object::{Library, QualifiedName};
use crate::scratch::ScratchSpec;
use crate::session::{
    CallReply, CatalogEntry, CatalogFilter, CatalogQuery, ProgramPath, ScratchHost, Session,
    SessionError,
};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

/// Scripted program: receives the attempt number (1-based, per program)
/// and the parameter block.
pub type ProgramHandler =
    Box<dyn FnMut(u32, &mut ParameterBlock) -> Result<CallReply, SessionError> + Send>;

/// Request recorded by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    Call { program: String, receiver: usize },
    CatalogOpened { object: String, object_type: String },
    CatalogClosed,
    SourceProbe(String),
    ScratchCreated(String),
    ScratchDeleted { name: String, existed: bool },
    ScratchDescribed(String),
    ScratchCommitted(String),
    ScratchRead { name: String, length: u32 },
}

/// Where an injected catalog failure happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFault {
    Open,
    Load,
}

/// Scratch operation that fails with a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScratchFault {
    Create,
    Delete,
    /// Both description and commit.
    Describe,
    Read,
}

enum Program {
    Scripted(ProgramHandler),
    /// Writes fixed data into the scratch object named by slot 0.
    List(Vec<u8>),
}

#[derive(Default)]
struct State {
    catalog: Vec<CatalogEntry>,
    catalog_fault: Option<CatalogFault>,
    source_files: HashSet<String>,
    programs: HashMap<String, Program>,
    attempts: HashMap<String, u32>,
    scratch: HashMap<QualifiedName, Vec<u8>>,
    refuse_create: bool,
    scratch_fault: Option<ScratchFault>,
    events: Vec<SimEvent>,
}

/// Simulated host.
#[derive(Default)]
pub struct SimHost {
    codec: FieldCodec,
    namespace_tag: Option<String>,
    state: Mutex<State>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(mut self, codec: FieldCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_namespace_tag(mut self, tag: &str) -> Self {
        self.namespace_tag = Some(tag.to_string());
        self
    }

    pub fn add_catalog_entry(&self, entry: CatalogEntry) {
        self.state.lock().catalog.push(entry);
    }

    /// Mark `LIB/NAME` as a source physical file.
    pub fn add_source_file(&self, library: &str, name: &str) {
        self.state
            .lock()
            .source_files
            .insert(format!("{}/{}", library, name));
    }

    pub fn set_catalog_fault(&self, fault: Option<CatalogFault>) {
        self.state.lock().catalog_fault = fault;
    }

    /// Refuse every scratch creation request.
    pub fn refuse_scratch(&self, refuse: bool) {
        self.state.lock().refuse_create = refuse;
    }

    pub fn set_scratch_fault(&self, fault: Option<ScratchFault>) {
        self.state.lock().scratch_fault = fault;
    }

    pub fn on_program<F>(&self, name: &str, handler: F)
    where
        F: FnMut(u32, &mut ParameterBlock) -> Result<CallReply, SessionError> + Send + 'static,
    {
        self.state
            .lock()
            .programs
            .insert(name.to_string(), Program::Scripted(Box::new(handler)));
    }

    /// Program with a result of `body.len()` bytes, delivered through the
    /// receiver in slot 0. Bytes 0..8 of `body` are replaced by the
    /// returned/available header.
    pub fn on_sized_result(&self, name: &str, body: Vec<u8>) {
        self.on_program(name, move |_, params| {
            let capacity = params.slot(0).map(Parameter::capacity).unwrap_or(0);
            let available = body.len().max(RECEIVER_HEADER_LEN);
            let returned = available.min(capacity);

            let mut data = body.clone();
            data.resize(available, 0);
            data[..4].copy_from_slice(&bin4(returned as u32));
            data[4..8].copy_from_slice(&bin4(available as u32));
            if let Some(slot) = params.slot_mut(0) {
                slot.fill(&data[..returned]);
            }
            Ok(CallReply::ok())
        });
    }

    /// List program that writes `data` into the scratch object in slot 0.
    pub fn on_list_program(&self, name: &str, data: Vec<u8>) {
        self.state
            .lock()
            .programs
            .insert(name.to_string(), Program::List(data));
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.state.lock().events.clone()
    }

    pub fn count<P: Fn(&SimEvent) -> bool>(&self, predicate: P) -> usize {
        self.state.lock().events.iter().filter(|e| predicate(e)).count()
    }

    /// Number of calls made to `program`.
    pub fn calls(&self, program: &str) -> usize {
        self.count(|e| matches!(e, SimEvent::Call { program: p, .. } if p == program))
    }

    /// Receiver sizes of every call to `program`, in order.
    pub fn receiver_sizes(&self, program: &str) -> Vec<usize> {
        self.state
            .lock()
            .events
            .iter()
            .filter_map(|e| match e {
                SimEvent::Call { program: p, receiver } if p == program => Some(*receiver),
                _ => None,
            })
            .collect()
    }

    /// Scratch objects that currently exist.
    pub fn live_scratch(&self) -> usize {
        self.state.lock().scratch.len()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    fn record(&self, event: SimEvent) {
        self.state.lock().events.push(event);
    }

    fn describe_fault(&self) -> Result<(), SessionError> {
        if self.state.lock().scratch_fault == Some(ScratchFault::Describe) {
            return Err(SessionError::Transport("describe failed".to_string()));
        }
        Ok(())
    }
}

fn library_matches(filter: &Library, library: &str) -> bool {
    filter.is_search_token() || filter.as_str() == library
}

fn name_matches(filter: &str, name: &str) -> bool {
    match filter.strip_suffix('*') {
        _ if filter == "*ALL" => true,
        Some(prefix) => name.starts_with(prefix),
        None => filter == name,
    }
}

impl Session for SimHost {
    fn call_program(
        &self,
        program: &ProgramPath,
        params: &mut ParameterBlock,
    ) -> Result<CallReply, SessionError> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let receiver = params.slot(0).map(Parameter::capacity).unwrap_or(0);
        state.events.push(SimEvent::Call {
            program: program.name().to_string(),
            receiver,
        });
        let attempt = state.attempts.entry(program.name().to_string()).or_insert(0);
        *attempt += 1;

        match state.programs.get_mut(program.name()) {
            Some(Program::Scripted(handler)) => handler(*attempt, params),
            Some(Program::List(data)) => {
                let bytes = params.slot(0).map(Parameter::input_bytes).unwrap_or_default();
                let name = QualifiedName::decode(&self.codec, bytes)
                    .map_err(|e| SessionError::Other(e.to_string()))?;
                let Some(space) = state.scratch.get_mut(&name) else {
                    return Err(SessionError::ObjectNotFound(name.to_string()));
                };
                if space.len() < data.len() {
                    space.resize(data.len(), 0);
                }
                space[..data.len()].copy_from_slice(data);
                Ok(CallReply::ok())
            }
            None => Err(SessionError::ObjectNotFound(program.ifs_path())),
        }
    }

    fn query_catalog(
        &self,
        filter: &CatalogFilter,
    ) -> Result<Box<dyn CatalogQuery + '_>, SessionError> {
        let fault = {
            let mut state = self.state.lock();
            state.events.push(SimEvent::CatalogOpened {
                object: filter.object.to_string(),
                object_type: filter.object_type.filter(),
            });
            state.catalog_fault
        };
        if fault == Some(CatalogFault::Open) {
            return Err(SessionError::Transport("catalog unavailable".to_string()));
        }
        Ok(Box::new(SimQuery {
            host: self,
            filter: filter.clone(),
            matches: Vec::new(),
        }))
    }

    fn is_source_file(&self, file: &QualifiedName) -> Result<bool, SessionError> {
        let key = file.to_string();
        let mut state = self.state.lock();
        state.events.push(SimEvent::SourceProbe(key.clone()));
        Ok(state.source_files.contains(&key))
    }

    fn namespace_tag(&self) -> Option<String> {
        self.namespace_tag.clone()
    }
}

impl ScratchHost for SimHost {
    fn create_scratch(&self, spec: &ScratchSpec) -> Result<bool, SessionError> {
        let mut state = self.state.lock();
        if state.refuse_create {
            return Ok(false);
        }
        if state.scratch_fault == Some(ScratchFault::Create) {
            return Err(SessionError::Transport("create failed".to_string()));
        }
        state
            .scratch
            .insert(spec.name.clone(), vec![spec.fill; spec.capacity as usize]);
        state.events.push(SimEvent::ScratchCreated(spec.name.to_string()));
        Ok(true)
    }

    fn delete_scratch(&self, name: &QualifiedName) -> Result<bool, SessionError> {
        let mut state = self.state.lock();
        if state.scratch_fault == Some(ScratchFault::Delete) {
            return Err(SessionError::Transport("delete failed".to_string()));
        }
        let existed = state.scratch.remove(name).is_some();
        state.events.push(SimEvent::ScratchDeleted {
            name: name.to_string(),
            existed,
        });
        Ok(existed)
    }

    fn read_scratch(
        &self,
        name: &QualifiedName,
        offset: u32,
        length: u32,
    ) -> Result<Vec<u8>, SessionError> {
        let mut state = self.state.lock();
        if state.scratch_fault == Some(ScratchFault::Read) {
            return Err(SessionError::Transport("read failed".to_string()));
        }
        let space = state
            .scratch
            .get(name)
            .ok_or_else(|| SessionError::ObjectNotFound(name.to_string()))?;
        let start = offset as usize;
        let end = start + length as usize;
        let bytes = space
            .get(start..end)
            .ok_or_else(|| SessionError::Other(format!("read past end of {}", name)))?
            .to_vec();
        state.events.push(SimEvent::ScratchRead {
            name: name.to_string(),
            length,
        });
        Ok(bytes)
    }

    fn scratch_size(&self, name: &QualifiedName) -> Result<u32, SessionError> {
        let state = self.state.lock();
        state
            .scratch
            .get(name)
            .map(|space| space.len() as u32)
            .ok_or_else(|| SessionError::ObjectNotFound(name.to_string()))
    }

    fn set_scratch_description(&self, name: &QualifiedName, _text: &str) -> Result<(), SessionError> {
        self.describe_fault()?;
        self.record(SimEvent::ScratchDescribed(name.to_string()));
        Ok(())
    }

    fn commit_scratch(&self, name: &QualifiedName) -> Result<(), SessionError> {
        self.describe_fault()?;
        self.record(SimEvent::ScratchCommitted(name.to_string()));
        Ok(())
    }
}

struct SimQuery<'a> {
    host: &'a SimHost,
    filter: CatalogFilter,
    matches: Vec<CatalogEntry>,
}

impl CatalogQuery for SimQuery<'_> {
    fn load(&mut self) -> Result<(), SessionError> {
        let state = self.host.state.lock();
        if state.catalog_fault == Some(CatalogFault::Load) {
            return Err(SessionError::Transport("catalog load failed".to_string()));
        }
        self.matches = state
            .catalog
            .iter()
            .filter(|e| name_matches(self.filter.object.name(), &e.name))
            .filter(|e| library_matches(self.filter.object.library(), &e.library))
            .filter(|e| self.filter.object_type.matches(&e.object_type))
            .cloned()
            .collect();
        Ok(())
    }

    fn len(&self) -> usize {
        self.matches.len()
    }

    fn entries(&mut self, offset: usize, count: usize) -> Result<Vec<CatalogEntry>, SessionError> {
        Ok(self
            .matches
            .iter()
            .skip(offset)
            .take(count)
            .cloned()
            .collect())
    }

    fn close(&mut self) -> Result<(), SessionError> {
        self.host.record(SimEvent::CatalogClosed);
        Ok(())
    }
}
