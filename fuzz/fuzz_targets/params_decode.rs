#![no_main]

use libfuzzer_sys::fuzz_target;
use pairing_vrf::{Generator, Bls12_381, Scheme, Vrf};

fuzz_target!(|data: &[u8]| {
    let _ = Generator::<Bls12_381>::from_bytes(data);

    // newline-separated string fields, as a remote party would ship them
    let Ok(text) = core::str::from_utf8(data) else { return };
    let parts: Vec<String> = text.split('\n').map(str::to_owned).collect();
    for scheme in Scheme::ALL {
        let mut vrf: Vrf = Vrf::new(scheme);
        let _ = vrf.unmarshal_params(&parts);
        let _ = vrf.unmarshal_public_key(&parts);
        let _ = vrf.unmarshal_proof(&parts);
    }
});
