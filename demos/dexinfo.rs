use dexview::dex::{DexFile, MemberKind};
use std::env;
use std::error::Error;
use std::fs;

fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        eprintln!("usage: dexinfo <classes.dex>");
        return;
    };

    // Do everything else with the error trap
    if let Err(e) = dump_dex(path) {
        println!("Aborted due to error: {}", e);
    }
}

fn dump_dex(path: &str) -> Result<(), Box<dyn Error>> {
    let dex = DexFile::from_vec(fs::read(path)?)?;
    let h = dex.header();
    println!("dex version {:03}, {} bytes", dex.version(), h.file_size);
    println!(
        "strings {} / types {} / protos {} / fields {} / methods {} / classes {}",
        h.string_ids_size, h.type_ids_size, h.proto_ids_size, h.field_ids_size, h.method_ids_size, h.class_defs_size
    );

    for summary in dex.class_summaries() {
        let c = summary?;
        println!();
        println!("{} {}", c.access_flags.modifiers(MemberKind::Class).join(" "), c.descriptor);
        if let Some(s) = &c.superclass {
            println!("  extends {}", s);
        }
        for i in &c.interfaces {
            println!("  implements {}", i);
        }
        if let Some(src) = &c.source_file {
            println!("  source {}", src);
        }
        for f in &c.fields {
            println!(
                "  field {} {}:{}",
                f.access_flags.modifiers(MemberKind::Field).join(" "),
                f.field.name,
                f.field.type_descriptor
            );
        }
        for m in &c.methods {
            println!(
                "  method {} {}{}",
                m.access_flags.modifiers(MemberKind::Method).join(" "),
                m.method.name,
                m.method.descriptor()
            );
        }
    }

    Ok(())
}
