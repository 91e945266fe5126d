#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Input bytes drive a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 3;
        let arg = data[idx];
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let _ = reader.read_bits(arg % 66);
            }
            _ => {
                let _ = reader.skip_bits(usize::from(arg));
            }
        }
        assert!(reader.bit_position() <= data.len() * 8);
    }
});
