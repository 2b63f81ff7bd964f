use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.is_empty() {
                return;
            }
            let fragment_length = 1 + usize::from(data[0]);
            let workloads = bc32ur::encode(data, fragment_length).unwrap();
            assert_eq!(bc32ur::decode(&workloads, "bytes").unwrap(), data);
        });
    }
}
