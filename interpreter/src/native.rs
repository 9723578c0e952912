use crate::environment::{self, Env};
use crate::interpreter::Interpreter;
use crate::value::{Callable, Value};
use wisp_errors::RuntimeError;
use wisp_span::Symbol;

/// A built-in callable. Native functions are plain function pointers rather
/// than closures: none of them capture anything beyond what `Interpreter`
/// (and thus [`crate::host::HostServices`]) already exposes.
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub call: fn(&mut Interpreter, &[Value]) -> Result<Value, RuntimeError>,
}

macro_rules! native {
    ($globals:expr, $name:literal, $arity:expr, $func:expr) => {
        environment::define(
            $globals,
            Symbol::intern($name),
            Value::Callable(Callable::Native(std::rc::Rc::new(NativeFunction {
                name: $name,
                arity: $arity,
                call: $func,
            }))),
        );
    };
}

/// Registers every intrinsic into `globals`, the frame the interpreter
/// consults before falling back to "undefined variable".
pub fn install(globals: &Env) {
    native!(globals, "clock", 0, |interp, _| Ok(Value::Number(interp.host.clock())));
    native!(globals, "_trunc", 1, |_, args| match &args[0] {
        Value::Number(n) => Ok(Value::Number(n.trunc())),
        _ => Ok(Value::Nil),
    });
    native!(globals, "_length", 1, |_, args| {
        Ok(Value::Number(args[0].stringify().chars().count() as f64))
    });
    native!(globals, "_chr", 1, |_, args| {
        let Some(byte) = as_byte(&args[0]) else { return Ok(Value::Nil) };
        Ok(Value::string(char::from(byte).to_string()))
    });
    native!(globals, "_ord", 1, |_, args| {
        let Value::String(s) = &args[0] else { return Ok(Value::Nil) };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Number(c as u32 as f64)),
            _ => Ok(Value::Nil),
        }
    });
    native!(globals, "_substring", 3, |_, args| {
        let Value::String(s) = &args[0] else { return Ok(Value::Nil) };
        let (Some(start), Some(count)) = (as_index(&args[1]), as_index(&args[2])) else {
            return Ok(Value::Nil);
        };
        let chars: Vec<char> = s.chars().collect();
        if start > chars.len() || count > chars.len() - start {
            return Ok(Value::Nil);
        }
        Ok(Value::string(chars[start..start + count].iter().collect::<String>()))
    });
    native!(globals, "_argc", 1, |interp, _| Ok(Value::Number(interp.host.argc() as f64)));
    native!(globals, "_argv", 0, |interp, _| match interp.host.next_arg() {
        Some(arg) => Ok(Value::string(arg)),
        None => Ok(Value::Nil),
    });
    native!(globals, "_stdin", 0, |_, _| Ok(Value::Number(0.0)));
    native!(globals, "_stdout", 0, |_, _| Ok(Value::Number(1.0)));
    native!(globals, "_stderr", 0, |_, _| Ok(Value::Number(2.0)));
    native!(globals, "_read", 1, |interp, args| {
        let Value::String(path) = &args[0] else { return Ok(Value::Nil) };
        match interp.host.open_read(path) {
            Some(handle) => Ok(Value::Number(handle as f64)),
            None => Ok(Value::Nil),
        }
    });
    native!(globals, "_write", 1, |interp, args| {
        let Value::String(path) = &args[0] else { return Ok(Value::Nil) };
        match interp.host.open_write(path) {
            Some(handle) => Ok(Value::Number(handle as f64)),
            None => Ok(Value::Nil),
        }
    });
    native!(globals, "_close", 1, |interp, args| {
        let Some(handle) = as_handle(&args[0]) else { return Ok(Value::Bool(false)) };
        Ok(Value::Bool(interp.host.close(handle)))
    });
    native!(globals, "_get", 1, |interp, args| {
        let Some(handle) = as_handle(&args[0]) else { return Ok(Value::Nil) };
        match interp.host.get_byte(handle) {
            Some(byte) => Ok(Value::Number(byte as f64)),
            None => Ok(Value::Nil),
        }
    });
    native!(globals, "_put", 2, |interp, args| {
        let (Some(handle), Some(byte)) = (as_handle(&args[0]), as_byte(&args[1])) else {
            return Ok(Value::Nil);
        };
        Ok(Value::Bool(interp.host.put_byte(handle, byte)))
    });
}

fn as_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as usize),
        _ => None,
    }
}

fn as_byte(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) if (0.0..=255.0).contains(n) && n.fract() == 0.0 => Some(*n as u8),
        _ => None,
    }
}

fn as_handle(value: &Value) -> Option<u8> {
    as_byte(value)
}
