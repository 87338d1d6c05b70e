#![no_main]

use libfuzzer_sys::fuzz_target;
use tokio::io::AsyncReadExt;
use tokio::runtime::Runtime;
use tokio_multipart::multipart::Reader;

fuzz_target!(|data: &[u8]| {
    let rt = Runtime::new().unwrap();

    rt.block_on(async {
        let mut reader = Reader::new(data, "boundary");

        // Try to read up to 100 parts to avoid infinite loops
        for _ in 0..100 {
            match reader.next_part().await {
                Ok(Some(mut part)) => {
                    let _ = part.form_name();
                    let _ = part.file_name();
                    let mut body = Vec::new();
                    if part.read_to_end(&mut body).await.is_err() {
                        break;
                    }
                }
                Ok(None) | Err(_) => break,
            }
        }
    });
});
