//! Demo command handlers
//!
//! Each handler takes an options payload and a positional payload. The
//! payloads are plain serde structs; the router works out their shape from
//! the values registered here.

use anyhow::{bail, Result};
use argrouter::Router;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreetOptions {
    #[serde(rename = "times")]
    pub repeat: i64,
    pub shout: bool,
    pub greeting: String,
}

impl Default for GreetOptions {
    fn default() -> Self {
        Self {
            repeat: 1,
            shout: false,
            greeting: "hello".to_string(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GreetArgs {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EchoOptions {
    pub prefix: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EchoArgs {
    pub text: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct IntPair {
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FloatPair {
    pub a: f64,
    pub b: f64,
}

pub fn greet(options: GreetOptions, args: GreetArgs) -> Result<()> {
    debug!("greet {:?}", options);
    let line = format!("{} {}", options.greeting, args.name);
    let line = if options.shout {
        line.to_uppercase()
    } else {
        line
    };
    for _ in 0..options.repeat.max(0) {
        println!("{}", line);
    }
    Ok(())
}

pub fn echo(options: EchoOptions, args: EchoArgs) -> Result<()> {
    println!("{}{}", options.prefix, args.text);
    Ok(())
}

pub fn add(_: (), args: IntPair) -> Result<()> {
    println!("{}", checked_add(&args)?);
    Ok(())
}

pub fn add_float(_: (), args: FloatPair) -> Result<()> {
    println!("{}", args.a + args.b);
    Ok(())
}

pub fn div(_: (), args: IntPair) -> Result<()> {
    println!("{}", checked_div(&args)?);
    Ok(())
}

fn checked_add(args: &IntPair) -> Result<i64> {
    match args.a.checked_add(args.b) {
        Some(sum) => Ok(sum),
        None => bail!("{} + {} overflows", args.a, args.b),
    }
}

fn checked_div(args: &IntPair) -> Result<i64> {
    if args.b == 0 {
        bail!("division by zero");
    }
    match args.a.checked_div(args.b) {
        Some(quotient) => Ok(quotient),
        None => bail!("{} / {} overflows", args.a, args.b),
    }
}

/// Register every demo command on a new router
pub fn build_router() -> Router {
    let mut router = Router::new();
    router
        .route(
            "greet",
            greet,
            GreetOptions::default(),
            "greet [-times N] [-shout BOOL] [-greeting TEXT] <name>",
        )
        .route("echo", echo, EchoOptions::default(), "echo [-prefix TEXT] <text>")
        .route("math add", add, (), "math add <a> <b>: add two integers")
        .route(
            "math add float",
            add_float,
            (),
            "math add float <a> <b>: add two floats",
        )
        .route("math div", div, (), "math div <a> <b>: integer division");
    router
}
