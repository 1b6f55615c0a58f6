use anyhow::Context;
use ext_icon_gen::raw_png::{read_chunks, Header, IDAT, IHDR};

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "icon.png".to_string());

    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {path}"))?;
    let chunks = read_chunks(&bytes)?;

    println!("Chunks in: {}", path);
    println!("File size: {} bytes", bytes.len());

    let mut bad_checksums = 0;
    for chunk in &chunks {
        let status = if chunk.crc_matches() {
            "ok"
        } else {
            bad_checksums += 1;
            "MISMATCH"
        };
        println!(
            "  {} length={:<8} crc={:08x} ({})",
            chunk.tag_name(),
            chunk.data.len(),
            chunk.stored_crc,
            status
        );

        if chunk.tag == IHDR {
            let header = Header::from_bytes(chunk.data)?;
            println!(
                "      {}x{} bit depth {} colour type {} interlace {}",
                header.width,
                header.height,
                header.bit_depth,
                header.color_type,
                header.interlace_method
            );

            let raw_len = header.width as usize * header.height as usize * 4;
            if let Some(idat) = chunks.iter().find(|c| c.tag == IDAT) {
                if idat.data.len() == raw_len {
                    println!("      IDAT holds unfiltered, uncompressed RGBA");
                }
            }
        }
    }

    if bad_checksums == 0 {
        println!("\n✓ All checksums valid");
    } else {
        println!("\n⚠ {bad_checksums} chunk(s) carry placeholder checksums; decoders will reject this file");
    }
    Ok(())
}
