//! The 166 public MACCS keys. Bit `i` is key `i + 1`; a non-zero count means
//! the key is set when there are more than that many unique matches.

use crate::schemes::keys::{KeyDef, KeyTable};
use crate::schemes::FingerprintScheme;
use crate::toolkit::ToolkitError;

const ISOTOPE: &str = "?isotope";
const AROMATIC_RINGS: &str = "?aromatic-rings";
const FRAGMENTS: &str = "?fragments";

pub const MACCS_KEYS: [(&str, usize); 166] = [
    (ISOTOPE, 0),
    ("[#104,#105,#106,#107,#108,#109,#110,#111,#112]", 0),
    ("[#32,#33,#34,#50,#51,#52,#82,#83,#84]", 0),
    ("[Ac,Th,Pa,U,Np,Pu,Am,Cm,Bk,Cf,Es,Fm,Md,No,Lr]", 0),
    ("[Sc,Ti,Y,Zr,Hf]", 0),
    ("[La,Ce,Pr,Nd,Pm,Sm,Eu,Gd,Tb,Dy,Ho,Er,Tm,Yb,Lu]", 0),
    ("[V,Cr,Mn,Nb,Mo,Tc,Ta,W,Re]", 0),
    ("[!#6;!#1]1~*~*~*~1", 0),
    ("[Fe,Co,Ni,Ru,Rh,Pd,Os,Ir,Pt]", 0),
    ("[Be,Mg,Ca,Sr,Ba,Ra]", 0),
    ("*1~*~*~*~1", 0),
    ("[Cu,Zn,Ag,Cd,Au,Hg]", 0),
    ("[#8]~[#7](~[#6])~[#6]", 0),
    ("[#16]-[#16]", 0),
    ("[#8]~[#6](~[#8])~[#8]", 0),
    ("[!#6;!#1]1~*~*~1", 0),
    ("[#6]#[#6]", 0),
    ("[#5,#13,#31,#49,#81]", 0),
    ("*1~*~*~*~*~*~*~1", 0),
    ("[#14]", 0),
    ("[#6]=[#6](~[!#6;!#1])~[!#6;!#1]", 0),
    ("*1~*~*~1", 0),
    ("[#7]~[#6](~[#8])~[#8]", 0),
    ("[#7]-[#8]", 0),
    ("[#7]~[#6](~[#7])~[#7]", 0),
    ("[#6]=;@[#6](@*)@*", 0),
    ("[I]", 0),
    ("[!#6;!#1]~[CH2]~[!#6;!#1]", 0),
    ("[#15]", 0),
    ("[#6]~[!#6;!#1](~[#6])(~[#6])~*", 0),
    ("[!#6;!#1]~[F,Cl,Br,I]", 0),
    ("[#6]~[#16]~[#7]", 0),
    ("[#7]~[#16]", 0),
    ("[CH2]=*", 0),
    ("[Li,Na,K,Rb,Cs,Fr]", 0),
    ("[#16R]", 0),
    ("[#7]~[#6](~[#8])~[#7]", 0),
    ("[#7]~[#6](~[#6])~[#7]", 0),
    ("[#8]~[#16](~[#8])~[#8]", 0),
    ("[#16]-[#8]", 0),
    ("[#6]#[#7]", 0),
    ("F", 0),
    ("[!#6;!#1;!H0]~*~[!#6;!#1;!H0]", 0),
    ("[!#1;!#6;!#7;!#8;!#9;!#14;!#15;!#16;!#17;!#35;!#53]", 0),
    ("[#6]=[#6]~[#7]", 0),
    ("Br", 0),
    ("[#16]~*~[#7]", 0),
    ("[#8]~[!#6;!#1](~[#8])(~[#8])", 0),
    ("[!+0]", 0),
    ("[#6]=[#6](~[#6])~[#6]", 0),
    ("[#6]~[#16]~[#8]", 0),
    ("[#7]~[#7]", 0),
    ("[!#6;!#1;!H0]~*~*~*~[!#6;!#1;!H0]", 0),
    ("[!#6;!#1;!H0]~*~*~[!#6;!#1;!H0]", 0),
    ("[#8]~[#16]~[#8]", 0),
    ("[#8]~[#7](~[#8])~[#6]", 0),
    ("[#8R]", 0),
    ("[!#6;!#1]~[#16]~[!#6;!#1]", 0),
    ("[#16]!:*:*", 0),
    ("[#16]=[#8]", 0),
    ("*~[#16](~*)~*", 0),
    ("*@*!@*@*", 0),
    ("[#7]=[#8]", 0),
    ("*@*!@[#16]", 0),
    ("c:n", 0),
    ("[#6]~[#6](~[#6])(~[#6])~*", 0),
    ("[!#6;!#1]~[#16]", 0),
    ("[!#6;!#1;!H0]~[!#6;!#1;!H0]", 0),
    ("[!#6;!#1]~[!#6;!#1;!H0]", 0),
    ("[!#6;!#1]~[#7]~[!#6;!#1]", 0),
    ("[#7]~[#8]", 0),
    ("[#8]~*~*~[#8]", 0),
    ("[#16]=*", 0),
    ("[CH3]~*~[CH3]", 0),
    ("*!@[#7]@*", 0),
    ("[#6]=[#6](~*)~*", 0),
    ("[#7]~*~[#7]", 0),
    ("[#6]=[#7]", 0),
    ("[#7]~*~*~[#7]", 0),
    ("[#7]~*~*~*~[#7]", 0),
    ("[#16]~*(~*)~*", 0),
    ("*~[CH2]~[!#6;!#1;!H0]", 0),
    ("[!#6;!#1]1~*~*~*~*~1", 0),
    ("[NH2]", 0),
    ("[#6]~[#7](~[#6])~[#6]", 0),
    ("[C;H2,H3][!#6;!#1][C;H2,H3]", 0),
    ("[F,Cl,Br,I]!@*@*", 0),
    ("[#16]", 0),
    ("[#8]~*~*~*~[#8]", 0),
    ("[$([!#6;!#1;!H0]~*~*~[CH2]~*),$([!#6;!#1;!H0;R]1@[R]@[R]@[CH2;R]1),$([!#6;!#1;!H0]~[R]1@[R]@[CH2;R]1)]", 0),
    ("[$([!#6;!#1;!H0]~*~*~*~[CH2]~*),$([!#6;!#1;!H0;R]1@[R]@[R]@[R]@[CH2;R]1),$([!#6;!#1;!H0]~[R]1@[R]@[R]@[CH2;R]1),$([!#6;!#1;!H0]~*~[R]1@[R]@[CH2;R]1)]", 0),
    ("[#8]~[#6](~[#7])~[#6]", 0),
    ("[!#6;!#1]~[CH3]", 0),
    ("[!#6;!#1]~[#7]", 0),
    ("[#7]~*~*~[#8]", 0),
    ("*1~*~*~*~*~1", 0),
    ("[#7]~*~*~*~[#8]", 0),
    ("[!#6;!#1]1~*~*~*~*~*~1", 0),
    ("[#6]=[#6]", 0),
    ("*~[CH2]~[#7]", 0),
    ("[$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1),$([R]@1@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]@[R]1)]", 0),
    ("[!#6;!#1]~[#8]", 0),
    ("Cl", 0),
    ("[!#6;!#1;!H0]~*~[CH2]~*", 0),
    ("*@*(@*)@*", 0),
    ("[!#6;!#1]~*(~[!#6;!#1])~[!#6;!#1]", 0),
    ("[F,Cl,Br,I]~*(~*)~*", 0),
    ("[CH3]~*~*~*~[CH2]~*", 0),
    ("*~[CH2]~[#8]", 0),
    ("[#7]~[#6]~[#8]", 0),
    ("[#7]~*~[CH2]~*", 0),
    ("*~*(~*)(~*)~*", 0),
    ("[#8]!:*:*", 0),
    ("[CH3]~[CH2]~*", 0),
    ("[CH3]~*~[CH2]~*", 0),
    ("[$([CH3]~*~*~[CH2]~*),$([CH3]~*1~*~[CH2]1)]", 0),
    ("[#7]~*~[#8]", 0),
    ("[$(*~[CH2]~[CH2]~*),$(*1~[CH2]~[CH2]1)]", 1),
    ("[#7]=*", 0),
    ("[!#6;R]", 1),
    ("[#7;R]", 0),
    ("*~[#7](~*)~*", 0),
    ("[#8]~[#6]~[#8]", 0),
    ("[!#6;!#1]~[!#6;!#1]", 0),
    (AROMATIC_RINGS, 1),
    ("*!@[#8]!@*", 0),
    ("*@*!@[#8]", 1),
    ("[$(*~[CH2]~*~*~*~[CH2]~*),$([R]1@[CH2;R]@[R]@[R]@[R]@[CH2;R]1),$(*~[CH2]~[R]1@[R]@[R]@[CH2;R]1),$(*~[CH2]~*~[R]1@[R]@[CH2;R]1)]", 0),
    ("[$(*~[CH2]~*~*~[CH2]~*),$([R]1@[CH2]@[R]@[R]@[CH2;R]1),$(*~[CH2]~[R]1@[R]@[CH2;R]1)]", 0),
    ("[!#6;!#1]~[!#6;!#1]", 1),
    ("[!#6;!#1;!H0]", 1),
    ("[#8]~*~[CH2]~*", 0),
    ("*@*!@[#7]", 0),
    ("[F,Cl,Br,I]", 0),
    ("[#7]!:*:*", 0),
    ("[#8]=*", 1),
    ("[!C;!c;R]", 0),
    ("[!#6;!#1]~[CH2]~*", 1),
    ("[O;!H0]", 0),
    ("[#8]", 3),
    ("[CH3]", 2),
    ("[#7]", 1),
    ("*@*!@[#8]", 0),
    ("*!:*:*!:*", 0),
    ("*1~*~*~*~*~*~1", 1),
    ("[#8]", 2),
    ("[$(*~[CH2]~[CH2]~*),$([R]1@[CH2;R]@[CH2;R]1)]", 0),
    ("*~[!#6;!#1](~*)~*", 0),
    ("[C;H3,H4]", 1),
    ("*!@*@*!@*", 0),
    ("[#7;!H0]", 0),
    ("[#8]~[#6](~[#6])~[#6]", 0),
    ("[!#6;!#1]~[CH2]~*", 0),
    ("[#6]=[#8]", 0),
    ("*!@[CH2]!@*", 0),
    ("[#7]~*(~*)~*", 0),
    ("[#6]-[#8]", 0),
    ("[#6]-[#7]", 0),
    ("[#8]", 1),
    ("[C;H3,H4]", 0),
    ("[#7]", 0),
    ("a", 0),
    ("*1~*~*~*~*~*~1", 0),
    ("[#8]", 0),
    ("[R]", 0),
    (FRAGMENTS, 1),
];

fn key(definition: &str, count: usize) -> Result<KeyDef, ToolkitError> {
    Ok(match definition {
        ISOTOPE => KeyDef::Isotope,
        AROMATIC_RINGS => KeyDef::AromaticRingCount {
            hetero: false,
            min: count + 1,
        },
        FRAGMENTS => KeyDef::Fragments { min: count + 1 },
        smarts => KeyDef::smarts(smarts, count + 1)?,
    })
}

pub fn table() -> Result<KeyTable, ToolkitError> {
    let keys = MACCS_KEYS
        .iter()
        .map(|(definition, count)| key(definition, *count))
        .collect::<Result<Vec<_>, _>>()?;
    KeyTable::from_keys(FingerprintScheme::Maccs, keys)
}
