//! Owner profile, family members and household preferences.
//!
//! Roles carry a fixed privilege bundle; switching a member's role swaps the
//! whole bundle. Only the owner may register new members.

use serde::{Deserialize, Serialize};

use super::{check_new_password, PanelError, ValidationError};

pub const DEFAULT_OWNER_NAME: &str = "Usuario Principal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Administrador,
    Familiar,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Administrador => "Administrador",
            Role::Familiar => "Familiar",
        }
    }

    /// Bundle granted when a member is switched to this role
    pub fn privileges(self) -> Privileges {
        match self {
            Role::Administrador => Privileges {
                control_devices: true,
                view_camera: true,
            },
            Role::Familiar => Privileges {
                control_devices: false,
                view_camera: false,
            },
        }
    }

    fn other(self) -> Self {
        match self {
            Role::Administrador => Role::Familiar,
            Role::Familiar => Role::Administrador,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Privileges {
    pub control_devices: bool,
    pub view_camera: bool,
}

impl Privileges {
    /// What a freshly registered member gets, whatever the role
    pub const NEW_MEMBER: Privileges = Privileges {
        control_devices: false,
        view_camera: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub privileges: Privileges,
}

/// Add-member form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMember {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub is_admin: bool,
}

/// Built-in household routines switched on and off from Configuración
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRoutine {
    BuenosDias,
    ModoNoche,
    SalirDeCasa,
}

impl AutoRoutine {
    pub const ALL: [AutoRoutine; 3] = [
        AutoRoutine::BuenosDias,
        AutoRoutine::ModoNoche,
        AutoRoutine::SalirDeCasa,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AutoRoutine::BuenosDias => "Buenos días",
            AutoRoutine::ModoNoche => "Modo noche",
            AutoRoutine::SalirDeCasa => "Salir de casa",
        }
    }

    pub fn schedule(self) -> &'static str {
        match self {
            AutoRoutine::BuenosDias => "Lun-Vie 7:00 AM",
            AutoRoutine::ModoNoche => "Diario 10:00 PM",
            AutoRoutine::SalirDeCasa => "Manual",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            AutoRoutine::BuenosDias => "Enciende luces, ajusta temperatura",
            AutoRoutine::ModoNoche => "Apaga luces, activa seguridad",
            AutoRoutine::SalirDeCasa => "Apaga todo, activa alarma",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoRoutines {
    pub buenos_dias: bool,
    pub modo_noche: bool,
    pub salir_de_casa: bool,
}

impl Default for AutoRoutines {
    fn default() -> Self {
        Self {
            buenos_dias: true,
            modo_noche: true,
            salir_de_casa: false,
        }
    }
}

impl AutoRoutines {
    fn slot(&mut self, routine: AutoRoutine) -> &mut bool {
        match routine {
            AutoRoutine::BuenosDias => &mut self.buenos_dias,
            AutoRoutine::ModoNoche => &mut self.modo_noche,
            AutoRoutine::SalirDeCasa => &mut self.salir_de_casa,
        }
    }

    pub fn is_enabled(&self, routine: AutoRoutine) -> bool {
        match routine {
            AutoRoutine::BuenosDias => self.buenos_dias,
            AutoRoutine::ModoNoche => self.modo_noche,
            AutoRoutine::SalirDeCasa => self.salir_de_casa,
        }
    }

    /// Returns the new state
    pub fn toggle(&mut self, routine: AutoRoutine) -> bool {
        let slot = self.slot(routine);
        *slot = !*slot;
        tracing::debug!("{} {}", routine.label(), if *slot { "on" } else { "off" });
        *slot
    }
}

#[derive(Debug, Clone)]
pub struct FamilyPanel {
    owner_name: String,
    is_owner: bool,
    pub notifications_enabled: bool,
    pub auto_routines: AutoRoutines,
    members: Vec<FamilyMember>,
    next_id: u64,
}

impl FamilyPanel {
    pub fn new(is_owner: bool) -> Self {
        Self {
            owner_name: DEFAULT_OWNER_NAME.to_string(),
            is_owner,
            notifications_enabled: true,
            auto_routines: AutoRoutines::default(),
            members: Vec::new(),
            next_id: 0,
        }
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn admins(&self) -> Vec<&FamilyMember> {
        self.members
            .iter()
            .filter(|m| m.role == Role::Administrador)
            .collect()
    }

    pub fn family(&self) -> Vec<&FamilyMember> {
        self.members
            .iter()
            .filter(|m| m.role == Role::Familiar)
            .collect()
    }

    pub fn rename_owner(&mut self, name: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        self.owner_name = name.to_string();
        Ok(())
    }

    pub fn add_member(&mut self, form: &NewMember) -> Result<&FamilyMember, PanelError> {
        if !self.is_owner {
            return Err(ValidationError::NotOwner.into());
        }
        let name = form.username.trim();
        if name.is_empty() {
            return Err(ValidationError::UsernameRequired.into());
        }
        if self.members.iter().any(|m| m.name.eq_ignore_ascii_case(name)) {
            return Err(ValidationError::DuplicateMember.into());
        }
        check_new_password(&form.password, &form.confirm_password)?;

        self.next_id += 1;
        let role = if form.is_admin {
            Role::Administrador
        } else {
            Role::Familiar
        };
        self.members.push(FamilyMember {
            id: format!("miembro_{}", self.next_id),
            name: name.to_string(),
            role,
            privileges: Privileges::NEW_MEMBER,
        });
        tracing::info!("Registered family member {} as {}", name, role.label());
        Ok(&self.members[self.members.len() - 1])
    }

    /// Flip between Administrador and Familiar; returns the new role
    pub fn toggle_role(&mut self, id: &str) -> Result<Role, PanelError> {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| PanelError::UnknownMember(id.to_string()))?;
        member.role = member.role.other();
        member.privileges = member.role.privileges();
        Ok(member.role)
    }

    pub fn delete_member(&mut self, id: &str) -> Result<FamilyMember, PanelError> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| PanelError::UnknownMember(id.to_string()))?;
        Ok(self.members.remove(pos))
    }
}
