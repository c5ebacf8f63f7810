//! PIC18F45K50 special function register map.
//!
//! The firmware addresses SFRs by the low byte of their data-memory address
//! (e.g. ANSELB lives at 0xF5C and is passed as 0x5C).

use crate::error::{ProtocolError, ProtocolResult};

macro_rules! sfr_table {
    ($( $variant:ident => ($name:literal, $addr:literal) ),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Sfr {
            $( $variant, )+
        }

        impl Sfr {
            pub const ALL: &'static [Sfr] = &[ $( Sfr::$variant, )+ ];

            pub fn address(self) -> u8 {
                match self {
                    $( Sfr::$variant => $addr, )+
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $( Sfr::$variant => $name, )+
                }
            }
        }
    };
}

sfr_table! {
    Intcon => ("INTCON", 0xF2),
    Intcon2 => ("INTCON2", 0xF1),
    Intcon3 => ("INTCON3", 0xF0),
    Ssp1Con3 => ("SSP1CON3", 0xCB),
    Ssp1Msk => ("SSP1MSK", 0xCA),
    Ssp1Buf => ("SSP1BUF", 0xC9),
    Ssp1Add => ("SSP1ADD", 0xC8),
    Ssp1Stat => ("SSP1STAT", 0xC7),
    Ssp1Con1 => ("SSP1CON1", 0xC6),
    Ssp1Con2 => ("SSP1CON2", 0xC5),
    Adcon0 => ("ADCON0", 0xC2),
    Ccpr1H => ("CCPR1H", 0xBF),
    Ccpr1L => ("CCPR1L", 0xBE),
    Ccp1Con => ("CCP1CON", 0xBD),
    Tmr2 => ("TMR2", 0xBC),
    Pr2 => ("PR2", 0xBB),
    T2Con => ("T2CON", 0xBA),
    Pstr1Con => ("PSTR1CON", 0xB9),
    Baudcon1 => ("BAUDCON1", 0xB8),
    Pwm1Con => ("PWM1CON", 0xB7),
    Spbrgh1 => ("SPBRGH1", 0xB0),
    Spbrg1 => ("SPBRG1", 0xAF),
    TrisE => ("TRISE", 0x96),
    TrisD => ("TRISD", 0x95),
    TrisC => ("TRISC", 0x94),
    TrisB => ("TRISB", 0x93),
    TrisA => ("TRISA", 0x92),
    LatE => ("LATE", 0x8D),
    LatD => ("LATD", 0x8C),
    LatC => ("LATC", 0x8B),
    LatB => ("LATB", 0x8A),
    LatA => ("LATA", 0x89),
    PortE => ("PORTE", 0x84),
    PortD => ("PORTD", 0x83),
    PortC => ("PORTC", 0x82),
    PortB => ("PORTB", 0x81),
    PortA => ("PORTA", 0x80),
    Vrefcon0 => ("VREFCON0", 0x7D),
    Vrefcon1 => ("VREFCON1", 0x7C),
    Vrefcon2 => ("VREFCON2", 0x7B),
    AnselE => ("ANSELE", 0x5F),
    AnselD => ("ANSELD", 0x5E),
    AnselC => ("ANSELC", 0x5D),
    AnselB => ("ANSELB", 0x5C),
    AnselA => ("ANSELA", 0x5B),
    Ccptmrs => ("CCPTMRS", 0x59),
    GpRam1 => ("GP_RAM1", 0x52),
    GpRam2 => ("GP_RAM2", 0x51),
    GpRam3 => ("GP_RAM3", 0x50),
    GpRam4 => ("GP_RAM4", 0x4F),
}

impl Sfr {
    /// Looks a register up by its datasheet name, ignoring case.
    pub fn from_name(name: &str) -> ProtocolResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|sfr| sfr.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ProtocolError::UnknownRegister(name.to_string()))
    }

    pub fn from_address(address: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|sfr| sfr.address() == address)
    }
}

impl From<Sfr> for u8 {
    fn from(sfr: Sfr) -> Self {
        sfr.address()
    }
}

/// Named bits inside the MSSP1 and DAC control registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SfrBit {
    Ssp1StatSmp,
    Ssp1StatCke,
    Ssp1StatBf,
    Ssp1Con1Wcol,
    Ssp1Con1Sspov,
    Ssp1Con1Sspen,
    Ssp1Con1Ckp,
    Vrefcon1Dacen,
    Vrefcon1Daclps,
    Vrefcon1Dacoe,
    Vrefcon1Dacpss1,
    Vrefcon1Dacpss0,
    Vrefcon1Dacnss,
}

impl SfrBit {
    pub fn register(self) -> Sfr {
        match self {
            Self::Ssp1StatSmp | Self::Ssp1StatCke | Self::Ssp1StatBf => Sfr::Ssp1Stat,
            Self::Ssp1Con1Wcol | Self::Ssp1Con1Sspov | Self::Ssp1Con1Sspen | Self::Ssp1Con1Ckp => {
                Sfr::Ssp1Con1
            }
            Self::Vrefcon1Dacen
            | Self::Vrefcon1Daclps
            | Self::Vrefcon1Dacoe
            | Self::Vrefcon1Dacpss1
            | Self::Vrefcon1Dacpss0
            | Self::Vrefcon1Dacnss => Sfr::Vrefcon1,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Ssp1StatSmp => 7,
            Self::Ssp1StatCke => 6,
            Self::Ssp1StatBf => 0,
            Self::Ssp1Con1Wcol => 7,
            Self::Ssp1Con1Sspov => 6,
            Self::Ssp1Con1Sspen => 5,
            Self::Ssp1Con1Ckp => 4,
            Self::Vrefcon1Dacen => 7,
            Self::Vrefcon1Daclps => 6,
            Self::Vrefcon1Dacoe => 5,
            Self::Vrefcon1Dacpss1 => 3,
            Self::Vrefcon1Dacpss0 => 2,
            Self::Vrefcon1Dacnss => 0,
        }
    }
}

/// I/O ports and their analog-select, direction, latch and input registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    pub fn ansel(self) -> Sfr {
        match self {
            Self::A => Sfr::AnselA,
            Self::B => Sfr::AnselB,
            Self::C => Sfr::AnselC,
            Self::D => Sfr::AnselD,
            Self::E => Sfr::AnselE,
        }
    }

    pub fn tris(self) -> Sfr {
        match self {
            Self::A => Sfr::TrisA,
            Self::B => Sfr::TrisB,
            Self::C => Sfr::TrisC,
            Self::D => Sfr::TrisD,
            Self::E => Sfr::TrisE,
        }
    }

    pub fn lat(self) -> Sfr {
        match self {
            Self::A => Sfr::LatA,
            Self::B => Sfr::LatB,
            Self::C => Sfr::LatC,
            Self::D => Sfr::LatD,
            Self::E => Sfr::LatE,
        }
    }

    pub fn port(self) -> Sfr {
        match self {
            Self::A => Sfr::PortA,
            Self::B => Sfr::PortB,
            Self::C => Sfr::PortC,
            Self::D => Sfr::PortD,
            Self::E => Sfr::PortE,
        }
    }
}
