use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() {
                return;
            }
            let encoded = bc32ur::bc32::encode(data).unwrap();
            let decoded = bc32ur::bc32::decode(&encoded).unwrap();
            assert_eq!(data, decoded);
        });
    }
}
