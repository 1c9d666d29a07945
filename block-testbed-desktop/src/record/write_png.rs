use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use png::{Encoder, chunk::ChunkType};

use block_testbed_render::FrameBuffer;

/// Writes `frame` to a new PNG file at `path`, replacing any existing file.
pub fn write_frame(path: &Path, frame: &FrameBuffer) -> Result<(), std::io::Error> {
    let mut buf_writer = BufWriter::new(File::create(path)?);
    {
        let size = frame.size();
        let mut png_encoder = Encoder::new(&mut buf_writer, size.width, size.height);
        png_encoder.set_color(png::ColorType::Rgb);
        png_encoder.set_depth(png::BitDepth::Eight);
        png_encoder.set_compression(png::Compression::Best);
        let mut png_writer = png_encoder.write_header()?;
        write_color_metadata(&mut png_writer)?;
        png_writer.write_image_data(frame.data().as_flattened())?;
        png_writer.finish()?;
    }
    let file = buf_writer.into_inner()?;
    file.sync_all()?;
    Ok(())
}

/// Declares the image to be sRGB, with the compatibility gAMA and cHRM values the PNG
/// specification recommends alongside an sRGB chunk.
fn write_color_metadata<W: Write>(png_writer: &mut png::Writer<W>) -> Result<(), std::io::Error> {
    png_writer.write_chunk(ChunkType(*b"sRGB"), &[0])?;
    png_writer.write_chunk(ChunkType(*b"gAMA"), &45455_u32.to_be_bytes())?;
    png_writer.write_chunk(
        ChunkType(*b"cHRM"),
        &[
            31270, // White Point x
            32900, // White Point y
            64000, // Red x
            33000, // Red y
            30000, // Green x
            60000, // Green y
            15000, // Blue x
            6000,  // Blue y
        ]
        .into_iter()
        .flat_map(u32::to_be_bytes)
        .collect::<Box<[u8]>>(),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::{point2, size2};

    #[test]
    fn written_file_decodes_to_frame() {
        let mut frame = FrameBuffer::new(size2(3, 2)).unwrap();
        frame.set(point2(0, 0), [255, 0, 0]);
        frame.set(point2(2, 1), [0, 10, 200]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_frame(&path, &frame).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buffer = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buffer).unwrap();
        assert_eq!((info.width, info.height), (3, 2));
        assert_eq!(info.color_type, png::ColorType::Rgb);
        assert_eq!(&buffer[..info.buffer_size()], frame.data().as_flattened());
    }
}
