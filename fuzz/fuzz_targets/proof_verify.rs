#![no_main]

use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use pairing_vrf::{BigUint, Scheme, Vrf};

fn verifiers() -> &'static [Vrf; 3] {
    static V: OnceLock<[Vrf; 3]> = OnceLock::new();
    V.get_or_init(|| {
        Scheme::ALL.map(|s| {
            let mut vrf: Vrf = Vrf::new(s);
            vrf.generate(128).ok();
            vrf
        })
    })
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 9 { return; }
    let vrf = &verifiers()[usize::from(data[0]) % 3];
    let x = BigUint::from(u64::from_le_bytes(data[1..9].try_into().unwrap_or([0u8; 8])));

    let Ok(text) = core::str::from_utf8(&data[9..]) else { return };
    let mut fields = text.split('\n');
    let Some(value) = fields.next() else { return };
    let proof: Vec<String> = fields.map(str::to_owned).collect();

    let (Ok(value), Ok(proof)) = (vrf.unmarshal_value(value), vrf.unmarshal_proof(&proof)) else {
        return;
    };
    // a forged proof must never verify
    if let Ok(true) = vrf.verify(&x, &value, &proof) {
        let (honest, _) = vrf.eval(&x).expect("prover holds its key");
        assert_eq!(honest, value);
    }
});
