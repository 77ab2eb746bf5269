// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Behavioural properties of the codec, resolver, retry loop and scratch
//! lifecycle, driven through the simulated host.

use hostlink::codec::{bin4, decode_qualified, encode_qualified};
use hostlink::api;
use hostlink::sim::{CatalogFault, ScratchFault, SimEvent, SimHost};
use hostlink::{
    CallError, CallReply, CatalogEntry, CharSet, FieldCodec, GrowingCall, Invoker, ObjectKind,
    ObjectType, Parameter, ProgramPath, QualifiedName, ResolvedObject, RetryPolicy,
    ScratchManager, ScratchRequest, SessionError, PROGRAM_NOT_CALLED,
};
use std::panic::{catch_unwind, AssertUnwindSafe};

fn program(name: &str) -> ProgramPath {
    ProgramPath::new(QualifiedName::new(name, "QSYS").expect("program name"))
}

#[test]
fn qualified_path_roundtrip() {
    let names = [
        "A", "PAYROLL", "QRPGLESRC", "ABCDEFGHIJ", "$SYS", "#TMP@", "X1", "*LIBL", "*ALL",
    ];
    for charset in [CharSet::Ebcdic037, CharSet::Latin1] {
        let codec = FieldCodec::new(charset);
        for name in names {
            for library in names {
                let bytes = encode_qualified(&codec, name, library).expect("encode");
                assert_eq!(bytes.len(), 20);
                let (n, l) = decode_qualified(&codec, &bytes).expect("decode");
                assert_eq!((n.as_str(), l.as_str()), (name, library));
            }
        }
    }
}

#[test]
fn resolution_is_idempotent() {
    let host = SimHost::new();
    host.add_catalog_entry(CatalogEntry::new("PAYROLL", "MYLIB", "FILE", "PF"));
    host.add_catalog_entry(CatalogEntry::new("QRPGLESRC", "MYLIB", "FILE", "PF"));
    host.add_source_file("MYLIB", "QRPGLESRC");
    host.add_catalog_entry(CatalogEntry::new("BUILD", "TOOLS", "PGM", "CLLE"));

    let resolver = hostlink::Resolver::new(&host);
    for (name, library, object_type) in [
        ("PAYROLL", "*LIBL", ObjectType::File),
        ("QRPGLESRC", "MYLIB", ObjectType::File),
        ("BUILD", "*ALLUSR", ObjectType::Program),
        ("MISSING", "MYLIB", ObjectType::File),
    ] {
        let reference = QualifiedName::new(name, library).expect("name");
        let first = resolver.resolve(&reference, &object_type);
        let second = resolver.resolve(&reference, &object_type);
        assert_eq!(first.kind(), second.kind(), "{reference}");
        assert_eq!(first.reference(), second.reference(), "{reference}");
    }
}

#[test]
fn failing_catalog_yields_null() {
    let host = SimHost::new();
    host.add_catalog_entry(CatalogEntry::new("PAYROLL", "MYLIB", "FILE", "PF"));
    let resolver = hostlink::Resolver::new(&host);
    let reference = QualifiedName::new("PAYROLL", "MYLIB").expect("name");

    host.set_catalog_fault(Some(CatalogFault::Open));
    assert!(resolver.resolve(&reference, &ObjectType::File).is_null());
    assert!(resolver.try_resolve(&reference, &ObjectType::File).is_err());

    host.set_catalog_fault(Some(CatalogFault::Load));
    assert!(resolver.resolve(&reference, &ObjectType::File).is_null());

    // Every query that was opened has been closed.
    let opened = host.count(|e| matches!(e, SimEvent::CatalogOpened { .. }));
    let closed = host.count(|e| matches!(e, SimEvent::CatalogClosed));
    assert_eq!(opened, 3);
    assert_eq!(closed, 1);

    host.set_catalog_fault(None);
    assert!(!resolver.resolve(&reference, &ObjectType::File).is_null());
}

/// Program that reports `min(capacity + step, cap)` bytes available.
fn creeping_program(host: &SimHost, name: &str, step: u32, cap: u32) {
    host.on_program(name, move |_, params| {
        let capacity = params.slot(0).map(Parameter::capacity).unwrap_or(0) as u32;
        let available = (capacity + step).min(cap);
        let returned = capacity.min(available);

        let mut data = vec![0x5A; returned as usize];
        data[..4].copy_from_slice(&bin4(returned));
        data[4..8].copy_from_slice(&bin4(available));
        if let Some(slot) = params.slot_mut(0) {
            slot.fill(&data);
        }
        Ok(CallReply::ok())
    });
}

#[test]
fn growing_call_converges_to_cap() {
    for (initial, step, cap) in [(90, 100, 500), (16, 1, 20), (2048, 4096, 9000), (90, 7, 90)] {
        let host = SimHost::new();
        creeping_program(&host, "QUSROBJD", step, cap);

        let invoker = Invoker::new(&host).with_retry(RetryPolicy {
            max_attempts: 16,
            max_buffer_bytes: 1 << 20,
        });
        let call = GrowingCall::new("OBJD0100", vec![Parameter::ErrorCode])
            .with_initial_length(initial);
        let outcome = invoker
            .call_growing(&program("QUSROBJD"), &call)
            .expect("call");

        assert!(outcome.success);
        assert_eq!(outcome.payload.len(), cap as usize);
        let sizes = host.receiver_sizes("QUSROBJD");
        assert_eq!(sizes.last().copied(), Some(cap as usize));
        assert!(sizes.windows(2).all(|w| w[0] < w[1]), "{sizes:?}");
    }
}

#[test]
fn growing_call_hits_attempt_ceiling() {
    let host = SimHost::new();
    creeping_program(&host, "QUSROBJD", 10, 10_000);

    let err = Invoker::new(&host)
        .with_retry(RetryPolicy {
            max_attempts: 3,
            max_buffer_bytes: 1 << 20,
        })
        .call_growing(&program("QUSROBJD"), &GrowingCall::new("OBJD0100", Vec::new()))
        .unwrap_err();

    assert!(matches!(err, CallError::RetryLimit { attempts: 3, .. }));
    assert_eq!(host.calls("QUSROBJD"), 3);
}

#[test]
fn growing_call_reports_oversized_result() {
    let host = SimHost::new();
    host.on_sized_result("QUSRMBRD", vec![0; 200_000]);

    let err = Invoker::new(&host)
        .with_retry(RetryPolicy {
            max_attempts: 8,
            max_buffer_bytes: 150_000,
        })
        .call_growing(&program("QUSRMBRD"), &GrowingCall::new("MBRD0400", Vec::new()))
        .unwrap_err();

    assert!(matches!(
        err,
        CallError::ResultTooLarge {
            available: 200_000,
            limit: 150_000,
            ..
        }
    ));
}

#[test]
fn unknown_format_makes_no_call() {
    let host = SimHost::new();
    host.on_sized_result("QUSROBJD", vec![0; 90]);
    let err = Invoker::new(&host)
        .call_growing(&program("QUSROBJD"), &GrowingCall::new("OBJD9999", Vec::new()))
        .unwrap_err();
    assert!(matches!(err, CallError::UnknownFormat(_)));
    assert_eq!(host.calls("QUSROBJD"), 0);
}

/// Deletions of objects that existed, after the first creation.
fn deletes_after_create(host: &SimHost) -> usize {
    host.events()
        .iter()
        .skip_while(|e| !matches!(e, SimEvent::ScratchCreated(_)))
        .filter(|e| matches!(e, SimEvent::ScratchDeleted { existed: true, .. }))
        .count()
}

#[test]
fn scratch_deleted_once_on_success() {
    let host = SimHost::new();
    let manager = ScratchManager::new(&host, "QTEMP");
    let outcome = manager
        .with_scratch(&ScratchRequest::new(64).fill(0x40), |_| Ok(CallReply::ok()))
        .expect("scratch");

    assert!(outcome.success);
    assert_eq!(outcome.payload, vec![0x40; 64]);
    assert_eq!(deletes_after_create(&host), 1);
    assert_eq!(host.live_scratch(), 0);
}

#[test]
fn scratch_deleted_once_when_body_fails() {
    let host = SimHost::new();
    let manager = ScratchManager::new(&host, "QTEMP");

    let err = manager
        .with_scratch(&ScratchRequest::new(64), |_| {
            Err(CallError::Session(SessionError::Transport("reset".into())))
        })
        .unwrap_err();
    assert!(matches!(err, CallError::Session(_)));
    assert_eq!(deletes_after_create(&host), 1);

    let host = SimHost::new();
    let manager = ScratchManager::new(&host, "QTEMP");
    let outcome = manager
        .with_scratch(&ScratchRequest::new(64), |_| Ok(CallReply::failed(Vec::new())))
        .expect("scratch");
    assert!(!outcome.success);
    assert!(outcome.payload.is_empty());
    assert_eq!(deletes_after_create(&host), 1);
    assert!(!host
        .events()
        .iter()
        .any(|e| matches!(e, SimEvent::ScratchRead { .. })));
}

#[test]
fn scratch_deleted_once_when_body_panics() {
    let host = SimHost::new();
    let manager = ScratchManager::new(&host, "QTEMP");

    let result = catch_unwind(AssertUnwindSafe(|| {
        manager.with_scratch(&ScratchRequest::new(64), |_| panic!("body exploded"))
    }));
    assert!(result.is_err());
    assert_eq!(deletes_after_create(&host), 1);
    assert_eq!(host.live_scratch(), 0);
}

#[test]
fn scratch_names_carry_namespace_tag() {
    let host = SimHost::new().with_namespace_tag("W17");
    let manager = ScratchManager::new(&host, "QTEMP");
    let mut seen = None;
    manager
        .with_scratch(&ScratchRequest::new(8), |spec| {
            seen = Some(spec.name.clone());
            Ok(CallReply::ok())
        })
        .expect("scratch");

    let name = seen.expect("body ran");
    assert!(name.name().starts_with("W17"));
    assert_eq!(name.name().len(), 10);
    assert_eq!(name.library().as_str(), "QTEMP");
}

#[test]
fn scratch_delete_failure_is_not_escalated() {
    let host = SimHost::new();
    host.set_scratch_fault(Some(ScratchFault::Delete));
    let manager = ScratchManager::new(&host, "QTEMP");

    let outcome = manager
        .with_scratch(&ScratchRequest::new(32), |_| Ok(CallReply::ok()))
        .expect("scratch");
    assert!(outcome.success);
    assert_eq!(outcome.payload.len(), 32);
    // The object outlives the failed delete.
    assert_eq!(host.live_scratch(), 1);
}

#[test]
fn scratch_create_error_skips_the_call() {
    let host = SimHost::new();
    host.set_scratch_fault(Some(ScratchFault::Create));
    host.on_list_program("QUSLRCD", vec![0x40; 16]);
    let invoker = Invoker::new(&host);
    let file = ResolvedObject::new(
        QualifiedName::new("PAYROLL", "MYLIB").expect("name"),
        ObjectKind::PhysicalFile,
    );

    let outcome = api::list_record_formats(&invoker, &file, "RCDL0100").expect("call");
    assert!(!outcome.success);
    assert!(outcome.payload.is_empty());
    assert_eq!(outcome.messages.len(), 1);
    assert_eq!(outcome.messages[0].text, PROGRAM_NOT_CALLED);
    assert_eq!(host.calls("QUSLRCD"), 0);
    assert_eq!(host.live_scratch(), 0);
}

#[test]
fn scratch_describe_failure_is_not_fatal() {
    let host = SimHost::new();
    host.set_scratch_fault(Some(ScratchFault::Describe));
    let manager = ScratchManager::new(&host, "QTEMP");

    let mut ran = false;
    let outcome = manager
        .with_scratch(&ScratchRequest::new(16).described("QUSLFLD userspace"), |_| {
            ran = true;
            Ok(CallReply::ok())
        })
        .expect("scratch");
    assert!(ran);
    assert!(outcome.success);
    assert_eq!(outcome.payload.len(), 16);
    assert_eq!(host.count(|e| matches!(e, SimEvent::ScratchDescribed(_))), 0);
    assert_eq!(host.count(|e| matches!(e, SimEvent::ScratchCommitted(_))), 0);
    assert_eq!(deletes_after_create(&host), 1);
}

#[test]
fn scratch_deleted_once_when_read_fails() {
    let host = SimHost::new();
    host.set_scratch_fault(Some(ScratchFault::Read));
    let manager = ScratchManager::new(&host, "QTEMP");

    let err = manager
        .with_scratch(&ScratchRequest::new(16), |_| Ok(CallReply::ok()))
        .unwrap_err();
    assert!(matches!(err, CallError::Session(SessionError::Transport(_))));
    assert_eq!(deletes_after_create(&host), 1);
    assert_eq!(host.live_scratch(), 0);
}
