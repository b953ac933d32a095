//! Built-in native functions and stream globals.
//!
//! The runtime pre-registers `print` and the file library (`fopen`,
//! `fclose`, `fgets`, `fputs`) in the same flat function table as
//! script functions, and installs `STDIN`/`STDOUT`/`STDERR` globals
//! wrapping the process streams. All file values are `NativePointer`s
//! tagged with [`NATIVE_LIB_NAME`].

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use rook_value::{NativePointer, StrRef, Value};

use crate::errors::{native_error, wrong_arg_count, EvalResult};
use crate::interpreter::Interpreter;

/// Library tag stamped on every file-stream pointer.
pub const NATIVE_LIB_NAME: &str = "rook.lang.file";

/// Payload of a file-stream `NativePointer`.
pub(crate) enum FileStream {
    Stdin,
    Stdout,
    Stderr,
    /// Opened for reading; `None` once closed.
    Reader(Option<BufReader<File>>),
    /// Opened for writing or appending; `None` once closed.
    Writer(Option<File>),
}

/// Wrap a stream payload as a script value.
pub(crate) fn stream_value(stream: FileStream) -> Value {
    Value::NativePointer(NativePointer::new(NATIVE_LIB_NAME, stream))
}

/// `print(value)` — stringify and write through the print handler.
pub(crate) fn native_print(interp: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [value] = args else {
        return Err(wrong_arg_count("print", 1, args.len()));
    };
    interp.print_handler().print(&value.stringify());
    Ok(Value::Null)
}

/// `fopen(path, mode)` — returns a file pointer, or null on failure.
pub(crate) fn native_fopen(_interp: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [path, mode] = args else {
        return Err(wrong_arg_count("fopen", 2, args.len()));
    };
    let (Value::Str(path), Value::Str(mode)) = (path, mode) else {
        return Err(native_error("fopen expects string path and mode"));
    };
    let stream = match mode.as_str() {
        "r" => File::open(path.as_str())
            .ok()
            .map(|f| FileStream::Reader(Some(BufReader::new(f)))),
        "w" => OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_str())
            .ok()
            .map(|f| FileStream::Writer(Some(f))),
        "a" => OpenOptions::new()
            .append(true)
            .create(true)
            .open(path.as_str())
            .ok()
            .map(|f| FileStream::Writer(Some(f))),
        other => return Err(native_error(format!("fopen: unsupported mode `{other}`"))),
    };
    // Open failure is a script-visible null, not a runtime error.
    Ok(stream.map_or(Value::Null, stream_value))
}

/// `fclose(file)` — closes the underlying file; a no-op for the
/// process streams.
pub(crate) fn native_fclose(_interp: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [file] = args else {
        return Err(wrong_arg_count("fclose", 1, args.len()));
    };
    let Value::NativePointer(ptr) = file else {
        return Err(native_error("fclose: argument is not a file"));
    };
    ptr.with_data::<FileStream, ()>(|stream| match stream {
        FileStream::Reader(slot) => drop(slot.take()),
        FileStream::Writer(slot) => drop(slot.take()),
        _ => {}
    })
    .ok_or_else(|| native_error("fclose: argument is not a file"))?;
    Ok(Value::Null)
}

/// `fgets(file)` — reads one line including its newline; null at EOF.
pub(crate) fn native_fgets(_interp: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [file] = args else {
        return Err(wrong_arg_count("fgets", 1, args.len()));
    };
    let Value::NativePointer(ptr) = file else {
        return Err(native_error("fgets: argument is not a file"));
    };
    ptr.with_data::<FileStream, EvalResult<Value>>(read_line)
        .unwrap_or_else(|| Err(native_error("fgets: argument is not a file")))
}

fn read_line(stream: &mut FileStream) -> EvalResult<Value> {
    let mut line = String::new();
    let read = match stream {
        FileStream::Reader(Some(reader)) => reader.read_line(&mut line),
        FileStream::Stdin => std::io::stdin().lock().read_line(&mut line),
        FileStream::Reader(None) | FileStream::Writer(None) => {
            return Err(native_error("fgets: file is closed"));
        }
        _ => return Err(native_error("fgets: stream is not readable")),
    };
    match read {
        Ok(0) => Ok(Value::Null),
        Ok(_) => Ok(Value::Str(StrRef::owned(line))),
        Err(e) => Err(native_error(format!("fgets: {e}"))),
    }
}

/// `fputs(text, file)` — writes the text; output to `STDOUT` goes
/// through the print handler so embedders can capture it.
pub(crate) fn native_fputs(interp: &mut Interpreter, args: &[Value]) -> EvalResult<Value> {
    let [text, file] = args else {
        return Err(wrong_arg_count("fputs", 2, args.len()));
    };
    let Value::Str(text) = text else {
        return Err(native_error("fputs expects a string to write"));
    };
    let Value::NativePointer(ptr) = file else {
        return Err(native_error("fputs: argument is not a file"));
    };
    let handler = interp.print_handler();
    ptr.with_data::<FileStream, EvalResult<()>>(|stream| match stream {
        FileStream::Writer(Some(f)) => f
            .write_all(text.as_str().as_bytes())
            .map_err(|e| native_error(format!("fputs: {e}"))),
        FileStream::Stdout => {
            handler.print(text.as_str());
            Ok(())
        }
        FileStream::Stderr => {
            eprint!("{text}");
            Ok(())
        }
        FileStream::Reader(None) | FileStream::Writer(None) => {
            Err(native_error("fputs: file is closed"))
        }
        FileStream::Reader(Some(_)) | FileStream::Stdin => {
            Err(native_error("fputs: stream is not writable"))
        }
    })
    .unwrap_or_else(|| Err(native_error("fputs: argument is not a file")))?;
    Ok(Value::Null)
}
