// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed wrappers over the host's retrieve and list programs.
//!
//! | Operation | Program | Shape |
//! |-----------|---------|-------|
//! | [`delete_user_space`] | QUSDLTUS | fixed |
//! | [`object_description`] | QUSROBJD | growing |
//! | [`program_information`] | QCLRPGMI | growing |
//! | [`file_description`] | QDBRTVFD | growing |
//! | [`member_description`] | QUSRMBRD | growing |
//! | [`list_fields`] | QUSLFLD | scratch |
//! | [`list_record_formats`] | QUSLRCD | scratch |
//! | [`list_save_file`] | QSRLSAVF | scratch |
//!
//! Every wrapper checks the object kind before anything is sent.

use crate::codec::QUALIFIED_PATH_LEN;
use crate::error::{CallError, CallResult};
use crate::invoke::{CallOutcome, GrowingCall, Invoker, Parameter, ParameterBlock};
use crate::logging;
use crate::object::{ObjectKind, QualifiedName, ResolvedObject};
use crate::scratch::ScratchRequest;
use crate::session::{Host, ProgramPath};

const FORMAT_LEN: usize = 8;
const NAME_FIELD_LEN: usize = 10;
const CONTINUATION_HANDLE_LEN: usize = 36;

/// Member selector meaning the first member of the file.
pub const FIRST_MEMBER: &str = "*FIRST";

/// Delete a user space. Any diagnostic counts as failure.
pub fn delete_user_space<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    space: &QualifiedName,
) -> CallResult<CallOutcome> {
    let program = ProgramPath::system("QUSDLTUS");
    let mut block = ParameterBlock::new()
        .with(Parameter::input(space.encode(invoker.codec())?))
        .with(Parameter::ErrorCode);
    invoker.call_fixed(&program, &mut block, &[])
}

/// Object description (OBJD0100..OBJD0400). Applies to every kind.
pub fn object_description<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    format: &str,
) -> CallResult<CallOutcome> {
    let codec = invoker.codec();
    let object_type = object.kind().object_type().filter();
    let tail = vec![
        Parameter::input(codec.char_field(format, FORMAT_LEN)),
        Parameter::input(object.reference().encode(codec)?),
        Parameter::input(codec.char_field(&object_type, NAME_FIELD_LEN)),
        Parameter::ErrorCode,
    ];
    invoker.call_growing(
        &ProgramPath::system("QUSROBJD"),
        &GrowingCall::new(format, tail),
    )
}

/// Program information (PGMI0100).
pub fn program_information<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    format: &str,
) -> CallResult<CallOutcome> {
    require("program_information", object, |k| k == ObjectKind::Program)?;
    let codec = invoker.codec();
    let tail = vec![
        Parameter::input(codec.char_field(format, FORMAT_LEN)),
        Parameter::input(object.reference().encode(codec)?),
        Parameter::ErrorCode,
    ];
    invoker.call_growing(
        &ProgramPath::system("QCLRPGMI"),
        &GrowingCall::new(format, tail),
    )
}

/// Database file description (FILD0100..FILD0400).
///
/// FILD0200 describes the first record format; the others take none.
/// Override processing is off and the description is the external one
/// of the local system.
pub fn file_description<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    format: &str,
) -> CallResult<CallOutcome> {
    require("file_description", object, ObjectKind::is_database_file)?;
    let codec = invoker.codec();
    let record_format = if format == "FILD0200" { "*FIRST" } else { "" };
    let tail = vec![
        // Returned file name, filled by the host.
        Parameter::output(QUALIFIED_PATH_LEN),
        Parameter::input(codec.char_field(format, FORMAT_LEN)),
        Parameter::input(object.reference().encode(codec)?),
        Parameter::input(codec.char_field(record_format, NAME_FIELD_LEN)),
        Parameter::input(codec.char_field("0", 1)),
        Parameter::input(codec.char_field("*LCL", NAME_FIELD_LEN)),
        Parameter::input(codec.char_field("*EXT", NAME_FIELD_LEN)),
        Parameter::ErrorCode,
    ];
    invoker.call_growing(
        &ProgramPath::system("QDBRTVFD"),
        &GrowingCall::new(format, tail),
    )
}

/// Member description (MBRD0100..MBRD0500), with overrides processed.
pub fn member_description<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    member: Option<&str>,
    format: &str,
) -> CallResult<CallOutcome> {
    require("member_description", object, ObjectKind::is_database_file)?;
    let codec = invoker.codec();
    let tail = vec![
        Parameter::input(codec.char_field(format, FORMAT_LEN)),
        Parameter::input(object.reference().encode(codec)?),
        Parameter::input(codec.char_field(member.unwrap_or(FIRST_MEMBER), NAME_FIELD_LEN)),
        Parameter::input(codec.char_field("1", 1)),
        Parameter::ErrorCode,
    ];
    invoker.call_growing(
        &ProgramPath::system("QUSRMBRD"),
        &GrowingCall::new(format, tail),
    )
}

/// Fields of one record format (FLDL0100). The payload is the list space.
pub fn list_fields<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    record_format: &str,
    format: &str,
) -> CallResult<CallOutcome> {
    require("list_fields", object, ObjectKind::has_record_formats)?;
    let codec = invoker.codec();
    let settings = invoker.scratch_settings();
    let request = ScratchRequest::new(settings.field_list_capacity)
        .auto_extend(settings.auto_extend)
        .fill(settings.fill)
        .described("QUSLFLD userspace");

    invoker.call_into_scratch(&ProgramPath::system("QUSLFLD"), &request, |space| {
        Ok(ParameterBlock::new()
            .with(Parameter::input(space.name.encode(codec)?))
            .with(Parameter::input(codec.char_field(format, FORMAT_LEN)))
            .with(Parameter::input(object.reference().encode(codec)?))
            .with(Parameter::input(codec.char_field(record_format, NAME_FIELD_LEN)))
            .with(Parameter::input(codec.char_field("0", 1)))
            .with(Parameter::ErrorCode))
    })
}

/// Record formats of a database or device file (RCDL0100, RCDL0200).
pub fn list_record_formats<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    format: &str,
) -> CallResult<CallOutcome> {
    require("list_record_formats", object, ObjectKind::has_record_formats)?;
    let codec = invoker.codec();
    let settings = invoker.scratch_settings();
    let request = ScratchRequest::new(settings.record_list_capacity)
        .auto_extend(settings.auto_extend)
        .fill(settings.fill)
        .described("QUSLRCD userspace");

    invoker.call_into_scratch(&ProgramPath::system("QUSLRCD"), &request, |space| {
        Ok(ParameterBlock::new()
            .with(Parameter::input(space.name.encode(codec)?))
            .with(Parameter::input(codec.char_field(format, FORMAT_LEN)))
            .with(Parameter::input(object.reference().encode(codec)?))
            .with(Parameter::input(codec.char_field("0", 1)))
            .with(Parameter::ErrorCode))
    })
}

/// Contents of a save file (SAVF0100, SAVF0200...), filtered by object
/// name and type (`*ALL` for everything).
pub fn list_save_file<H: Host + ?Sized>(
    invoker: &Invoker<'_, H>,
    object: &ResolvedObject,
    format: &str,
    object_filter: &str,
    type_filter: &str,
) -> CallResult<CallOutcome> {
    require("list_save_file", object, |k| k == ObjectKind::SaveFile)?;
    let codec = invoker.codec();
    let settings = invoker.scratch_settings();
    let request = ScratchRequest::new(settings.save_file_capacity)
        .auto_extend(settings.auto_extend)
        .fill(settings.fill);

    invoker.call_into_scratch(&ProgramPath::system("QSRLSAVF"), &request, |space| {
        Ok(ParameterBlock::new()
            .with(Parameter::input(space.name.encode(codec)?))
            .with(Parameter::input(codec.char_field(format, FORMAT_LEN)))
            .with(Parameter::input(object.reference().encode(codec)?))
            .with(Parameter::input(codec.char_field(object_filter, NAME_FIELD_LEN)))
            .with(Parameter::input(codec.char_field(type_filter, NAME_FIELD_LEN)))
            // Blank continuation handle: start from the first entry.
            .with(Parameter::input(codec.char_field("", CONTINUATION_HANDLE_LEN)))
            .with(Parameter::ErrorCode))
    })
}

fn require<F>(operation: &'static str, object: &ResolvedObject, accepts: F) -> CallResult<()>
where
    F: Fn(ObjectKind) -> bool,
{
    if accepts(object.kind()) {
        return Ok(());
    }
    let err = CallError::Unsupported {
        operation,
        kind: object.kind(),
    };
    logging::report_call_failure(&object.reference().to_string(), &err);
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{bin4, CharSet, FieldCodec};
    use crate::sim::SimHost;

    fn object(name: &str, kind: ObjectKind) -> ResolvedObject {
        ResolvedObject::new(QualifiedName::new(name, "MYLIB").expect("name"), kind)
    }

    #[test]
    fn kind_checked_before_call() {
        let host = SimHost::new();
        let invoker = Invoker::new(&host);
        let file = object("PAYROLL", ObjectKind::PhysicalFile);

        let err = program_information(&invoker, &file, "PGMI0100").unwrap_err();
        assert!(matches!(
            err,
            CallError::Unsupported {
                operation: "program_information",
                kind: ObjectKind::PhysicalFile
            }
        ));
        assert!(list_save_file(&invoker, &file, "SAVF0100", "*ALL", "*ALL").is_err());
        let printer = object("QSYSPRT", ObjectKind::PrinterFile);
        assert!(file_description(&invoker, &printer, "FILD0100").is_err());
        assert!(host.events().is_empty());
    }

    #[test]
    fn printer_file_fields_and_formats() {
        let host = SimHost::new();
        host.on_list_program("QUSLFLD", vec![0x40; 64]);
        host.on_list_program("QUSLRCD", vec![0x40; 64]);
        let invoker = Invoker::new(&host);
        let printer = ResolvedObject::new(
            QualifiedName::new("QSYSPRT", "QSYS").expect("name"),
            ObjectKind::PrinterFile,
        );

        let fields = list_fields(&invoker, &printer, "QSYSPRT", "FLDL0100").expect("fields");
        assert!(fields.success);
        let formats = list_record_formats(&invoker, &printer, "RCDL0100").expect("formats");
        assert!(formats.success);
        assert_eq!(host.calls("QUSLFLD"), 1);
        assert_eq!(host.calls("QUSLRCD"), 1);

        let savf = object("BACKUP", ObjectKind::SaveFile);
        assert!(matches!(
            list_fields(&invoker, &savf, "BACKUP", "FLDL0100"),
            Err(CallError::Unsupported { operation: "list_fields", .. })
        ));
    }

    #[test]
    fn object_description_layout() {
        let host = SimHost::new().with_codec(FieldCodec::new(CharSet::Latin1));
        host.on_program("QUSROBJD", |_, params| {
            assert_eq!(params.len(), 6);
            assert_eq!(params.slot(2).map(Parameter::input_bytes), Some(&b"OBJD0100"[..]));
            assert_eq!(
                params.slot(3).map(Parameter::input_bytes),
                Some(&b"PAYROLL   MYLIB     "[..])
            );
            assert_eq!(params.slot(4).map(Parameter::input_bytes), Some(&b"*FILE     "[..]));
            let mut data = bin4(90).to_vec();
            data.extend_from_slice(&bin4(90));
            data.resize(90, b' ');
            if let Some(slot) = params.slot_mut(0) {
                slot.fill(&data);
            }
            Ok(crate::session::CallReply::ok())
        });

        let config = crate::config::HostConfig {
            charset: CharSet::Latin1,
            ..Default::default()
        };
        let invoker = Invoker::with_config(&host, &config);
        let outcome = object_description(
            &invoker,
            &object("PAYROLL", ObjectKind::PhysicalFile),
            "OBJD0100",
        )
        .expect("call");
        assert!(outcome.success);
        assert_eq!(outcome.payload.len(), 90);
    }

    #[test]
    fn member_defaults_to_first() {
        let host = SimHost::new().with_codec(FieldCodec::new(CharSet::Latin1));
        host.on_program("QUSRMBRD", |_, params| {
            assert_eq!(params.slot(4).map(Parameter::input_bytes), Some(&b"*FIRST    "[..]));
            assert_eq!(params.slot(5).map(Parameter::input_bytes), Some(&b"1"[..]));
            Ok(crate::session::CallReply::failed(Vec::new()))
        });
        let config = crate::config::HostConfig {
            charset: CharSet::Latin1,
            ..Default::default()
        };
        let invoker = Invoker::with_config(&host, &config);
        let outcome = member_description(
            &invoker,
            &object("QRPGLESRC", ObjectKind::SourcePhysicalFile),
            None,
            "MBRD0100",
        )
        .expect("call");
        assert!(!outcome.success);
        assert_eq!(host.receiver_sizes("QUSRMBRD"), vec![135]);
    }

    #[test]
    fn file_description_slots() {
        let host = SimHost::new().with_codec(FieldCodec::new(CharSet::Latin1));
        host.on_program("QDBRTVFD", |_, params| {
            assert_eq!(params.len(), 10);
            assert_eq!(params.slot(2).map(Parameter::capacity), Some(20));
            assert_eq!(params.slot(5).map(Parameter::input_bytes), Some(&b"*FIRST    "[..]));
            assert_eq!(params.slot(6).map(Parameter::input_bytes), Some(&b"0"[..]));
            assert_eq!(params.slot(7).map(Parameter::input_bytes), Some(&b"*LCL      "[..]));
            assert_eq!(params.slot(8).map(Parameter::input_bytes), Some(&b"*EXT      "[..]));
            Ok(crate::session::CallReply::failed(Vec::new()))
        });
        let config = crate::config::HostConfig {
            charset: CharSet::Latin1,
            ..Default::default()
        };
        let invoker = Invoker::with_config(&host, &config);
        file_description(&invoker, &object("PAYROLL", ObjectKind::LogicalFile), "FILD0200")
            .expect("call");
        assert_eq!(host.receiver_sizes("QDBRTVFD"), vec![2048]);
    }
}
