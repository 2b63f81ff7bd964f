use honggfuzz::fuzz;

use bc32ur::bc32::decode;

fn main() {
    loop {
        fuzz!(|data: &str| {
            decode(data).ok();
        });
    }
}
