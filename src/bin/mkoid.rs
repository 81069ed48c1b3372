//! Generates an object identifier.
//!
//! Provide a sequence of object identifiers in ‘dot integer’ notation and
//! you will receive the octet array of their encoded content, ready for
//! pasting into a constant definition.

use std::env;
use std::str::FromStr;
use derval::Oid;

fn process_one(arg: &str) -> Result<(), &'static str> {
    let oid = Oid::from_str(arg).map_err(
        |_| "not a well-formed object identifier"
    )?;
    let mut first = true;
    print!("[");
    for octet in oid.as_slice() {
        if !first { print!(", "); }
        else { first = false }
        print!("{}", octet);
    }
    println!("]");
    Ok(())
}

fn main() {
    let mut args = env::args();
    args.next().unwrap(); // Skip executable name.
    for arg in args {
        if let Err(err) = process_one(arg.as_ref()) {
            println!("{}: {}.", arg, err)
        }
    }
}
