//! Ciclo de vida de las entidades con estado.
//!
//! Cada transición se describe de forma declarativa: el `estado` que fija
//! (si alguno) y la columna de marca de tiempo que sella. Los repositorios
//! aplican la transición en un solo UPDATE junto con `updated_at`.
//!
//! Ninguna transición verifica el estado previo del registro: cualquier
//! endpoint de transición es invocable sin importar el estado actual.

pub const GARANTIA_ESTADO_INICIAL: &str = "PV";
pub const REEMBOLSO_ESTADO_INICIAL: &str = "PV";

/// Columna de marca de tiempo que sella una transición. Cada columna se
/// escribe de forma aditiva; ningún endpoint la limpia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stamp {
    ValidatedAt,
    InvalidatedAt,
    RevokedAt,
    PaidAt,
    SentedAt,
    CanceledAt,
}

impl Stamp {
    pub fn column(self) -> &'static str {
        match self {
            Stamp::ValidatedAt => "validated_at",
            Stamp::InvalidatedAt => "invalidated_at",
            Stamp::RevokedAt => "revoked_at",
            Stamp::PaidAt => "paid_at",
            Stamp::SentedAt => "sented_at",
            Stamp::CanceledAt => "canceled_at",
        }
    }
}

/// Efecto de una transición sobre el registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub nuevo_estado: Option<&'static str>,
    pub stamp: Stamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarantiaTransition {
    Validar,
    Invalidar,
    Revocar,
    Pagar,
    Enviar,
    Cancelar,
}

impl GarantiaTransition {
    pub fn spec(self) -> TransitionSpec {
        match self {
            GarantiaTransition::Validar => TransitionSpec {
                nuevo_estado: Some("V"),
                stamp: Stamp::ValidatedAt,
            },
            // Invalidar, revocar, pagar y enviar solo sellan la marca de
            // tiempo; el campo estado queda como esté.
            GarantiaTransition::Invalidar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::InvalidatedAt,
            },
            GarantiaTransition::Revocar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::RevokedAt,
            },
            GarantiaTransition::Pagar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::PaidAt,
            },
            GarantiaTransition::Enviar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::SentedAt,
            },
            GarantiaTransition::Cancelar => TransitionSpec {
                nuevo_estado: Some("cancelada"),
                stamp: Stamp::CanceledAt,
            },
        }
    }
}

/// La facturación no tiene columna de estado: su ciclo de vida es la
/// presencia de validated_at / revoked_at. Validar dos veces sobreescribe
/// la marca con una fecha posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacturacionTransition {
    Validar,
    Revocar,
}

impl FacturacionTransition {
    pub fn spec(self) -> TransitionSpec {
        match self {
            FacturacionTransition::Validar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::ValidatedAt,
            },
            FacturacionTransition::Revocar => TransitionSpec {
                nuevo_estado: None,
                stamp: Stamp::RevokedAt,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReembolsoTransition {
    Aprobar,
    Revocar,
}

impl ReembolsoTransition {
    pub fn spec(self) -> TransitionSpec {
        match self {
            ReembolsoTransition::Aprobar => TransitionSpec {
                nuevo_estado: Some("A"),
                stamp: Stamp::ValidatedAt,
            },
            ReembolsoTransition::Revocar => TransitionSpec {
                nuevo_estado: Some("R"),
                stamp: Stamp::RevokedAt,
            },
        }
    }
}

/// Cerrar y cancelar comparten canceled_at; el campo estado es el que
/// distingue ambos finales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubastaTransition {
    Cerrar,
    Cancelar,
}

impl SubastaTransition {
    pub fn spec(self) -> TransitionSpec {
        match self {
            SubastaTransition::Cerrar => TransitionSpec {
                nuevo_estado: Some("CERRADA"),
                stamp: Stamp::CanceledAt,
            },
            SubastaTransition::Cancelar => TransitionSpec {
                nuevo_estado: Some("CANCELADA"),
                stamp: Stamp::CanceledAt,
            },
        }
    }
}

/// Capacidad de borrado por entidad, en lugar de ramas especiales por
/// controlador. Usuario es la única entidad con borrado físico.
///
/// Cada handler de DELETE lleva los dos brazos de la capacidad; el que
/// la constante deja apagado (el físico en subasta y garantía, el
/// blando en usuario) queda inerte hasta que la constante cambie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCaps {
    pub hard_delete: bool,
}

pub const CAPS_USUARIO: EntityCaps = EntityCaps { hard_delete: true };
pub const CAPS_SUBASTA: EntityCaps = EntityCaps { hard_delete: false };
pub const CAPS_GARANTIA: EntityCaps = EntityCaps { hard_delete: false };

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garantia_validar_fija_estado_y_sello() {
        let spec = GarantiaTransition::Validar.spec();
        assert_eq!(spec.nuevo_estado, Some("V"));
        assert_eq!(spec.stamp.column(), "validated_at");
    }

    #[test]
    fn garantia_transiciones_sin_cambio_de_estado() {
        for (t, col) in [
            (GarantiaTransition::Invalidar, "invalidated_at"),
            (GarantiaTransition::Revocar, "revoked_at"),
            (GarantiaTransition::Pagar, "paid_at"),
            (GarantiaTransition::Enviar, "sented_at"),
        ] {
            let spec = t.spec();
            assert_eq!(spec.nuevo_estado, None);
            assert_eq!(spec.stamp.column(), col);
        }
    }

    #[test]
    fn garantia_cancelar_es_soft_cancel() {
        let spec = GarantiaTransition::Cancelar.spec();
        assert_eq!(spec.nuevo_estado, Some("cancelada"));
        assert_eq!(spec.stamp, Stamp::CanceledAt);
    }

    #[test]
    fn facturacion_solo_sella_marcas() {
        assert_eq!(FacturacionTransition::Validar.spec().nuevo_estado, None);
        assert_eq!(
            FacturacionTransition::Validar.spec().stamp.column(),
            "validated_at"
        );
        assert_eq!(
            FacturacionTransition::Revocar.spec().stamp.column(),
            "revoked_at"
        );
    }

    #[test]
    fn reembolso_aprobar_y_revocar() {
        assert_eq!(
            ReembolsoTransition::Aprobar.spec().nuevo_estado,
            Some("A")
        );
        assert_eq!(
            ReembolsoTransition::Revocar.spec().nuevo_estado,
            Some("R")
        );
    }

    #[test]
    fn subasta_cerrar_y_cancelar_comparten_sello() {
        let cerrar = SubastaTransition::Cerrar.spec();
        let cancelar = SubastaTransition::Cancelar.spec();
        assert_eq!(cerrar.nuevo_estado, Some("CERRADA"));
        assert_eq!(cancelar.nuevo_estado, Some("CANCELADA"));
        assert_eq!(cerrar.stamp, Stamp::CanceledAt);
        assert_eq!(cancelar.stamp, Stamp::CanceledAt);
    }

    #[test]
    fn capacidades_de_borrado() {
        assert!(CAPS_USUARIO.hard_delete);
        assert!(!CAPS_SUBASTA.hard_delete);
        assert!(!CAPS_GARANTIA.hard_delete);
    }

    // El DELETE de cada entidad despacha por su capacidad: usuario va al
    // borrado físico y subasta/garantía a la transición de cancelación.
    // El brazo contrario de cada handler es el camino de la capacidad
    // invertida.
    #[test]
    fn despacho_de_borrado_por_capacidad() {
        for (caps, fisico) in [
            (CAPS_USUARIO, true),
            (CAPS_SUBASTA, false),
            (CAPS_GARANTIA, false),
        ] {
            assert_eq!(caps.hard_delete, fisico);
        }

        // Las entidades sin borrado físico cancelan vía transición.
        assert_eq!(
            SubastaTransition::Cancelar.spec().stamp,
            Stamp::CanceledAt
        );
        assert_eq!(
            GarantiaTransition::Cancelar.spec().stamp,
            Stamp::CanceledAt
        );
    }
}
