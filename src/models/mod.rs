pub mod cliente;
pub mod facturacion;
pub mod garantia;
pub mod reembolso;
pub mod subasta;
pub mod usuario;

pub use cliente::{Cliente, ClienteCampos};
pub use facturacion::{Facturacion, FacturacionCampos};
pub use garantia::{Garantia, GarantiaCampos};
pub use reembolso::{Reembolso, ReembolsoCampos};
pub use subasta::{Subasta, SubastaCampos, SubastaEstado};
pub use usuario::{Usuario, UsuarioCampos};
